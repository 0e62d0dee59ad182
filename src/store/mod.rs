pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::vacation::Vacation;

pub use memory::InMemoryVacationStore;
pub use mysql::MySqlVacationStore;

/// Persistence port for vacation records.
///
/// Implementations own id assignment and make each single call atomic; they
/// give no guarantee across calls.
#[async_trait]
pub trait VacationStore: Send + Sync {
    /// Stores a new record and returns it with a freshly assigned id.
    async fn create(&self, vacation: Vacation) -> Result<Vacation, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Vacation>, StoreError>;

    async fn find_all_ordered_by_id(&self) -> Result<Vec<Vacation>, StoreError>;

    /// Records whose username contains `fragment`, ignoring case, ascending by id.
    /// An empty fragment matches every record.
    async fn find_all_matching(&self, fragment: &str) -> Result<Vec<Vacation>, StoreError>;

    /// Upsert by id. A record without id is created.
    async fn save(&self, vacation: Vacation) -> Result<Vacation, StoreError>;

    async fn delete_all(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("unreadable vacation row: {0}")]
    CorruptRow(String),
    #[error("{0}")]
    Unavailable(String),
}
