//! Vacation request lifecycle.
//!
//! Status moves between `CREATED`, `APPROVED` and `DECLINED`. Creation only
//! accepts `CREATED`; approve and decline only reject re-applying the status the
//! record already has, so `APPROVED <-> DECLINED` flips are allowed.
//!
//! Each operation is a plain read -> check -> write against the store with no
//! locking of its own; two concurrent approvals of one id can both pass the check.

use std::sync::Arc;

use derive_more::Display;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::vacation::{Status, Vacation};
use crate::store::{StoreError, VacationStore};

/// Operation a failure happened in; prefixes the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[display(fmt = "Request error")]
    Request,
    #[display(fmt = "Approval error")]
    Approval,
    #[display(fmt = "Decline error")]
    Decline,
}

#[derive(Debug, Error)]
pub enum VacationError {
    /// Creation attempted with a status other than `CREATED`.
    #[error("{stage}: {reason}")]
    InvalidState { stage: Stage, reason: String },
    /// The record already carries the requested status.
    #[error("{stage}: {reason}")]
    Conflict { stage: Stage, reason: String },
    #[error("{stage}: {reason}")]
    NotFound { stage: Stage, reason: String },
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl VacationError {
    /// Message without the stage prefix, e.g. `Vacation(7) already approved`.
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidState { reason, .. }
            | Self::Conflict { reason, .. }
            | Self::NotFound { reason, .. } => reason.clone(),
            Self::Store(err) => err.to_string(),
        }
    }
}

/// Stateless façade over a [`VacationStore`]; cheap to clone per worker.
#[derive(Clone)]
pub struct VacationService {
    store: Arc<dyn VacationStore>,
}

impl VacationService {
    pub fn new(store: Arc<dyn VacationStore>) -> Self {
        Self { store }
    }

    /// Stores a new request. Any id on the input is ignored; the store assigns one.
    pub async fn create_request(&self, vacation: Vacation) -> Result<Vacation, VacationError> {
        if vacation.status != Status::Created {
            warn!(status = %vacation.status, username = %vacation.username, "Rejected vacation request");
            return Err(VacationError::InvalidState {
                stage: Stage::Request,
                reason: "not allowed status".to_string(),
            });
        }

        let created = self.store.create(Vacation { id: None, ..vacation }).await?;
        info!(id = ?created.id, username = %created.username, "Vacation requested");
        Ok(created)
    }

    /// Case-insensitive substring search on username.
    ///
    /// Blank filters are dropped; with nothing left every record is returned.
    /// Filters are matched one by one and the results concatenated in filter
    /// order, so a record matching two filters shows up twice.
    pub async fn search<S: AsRef<str>>(
        &self,
        usernames: &[S],
    ) -> Result<Vec<Vacation>, VacationError> {
        let mut filters: Vec<&str> = usernames
            .iter()
            .map(AsRef::as_ref)
            .filter(|u| !u.trim().is_empty())
            .collect();
        if filters.is_empty() {
            filters.push("");
        }

        let mut found = Vec::new();
        for filter in filters {
            found.extend(self.store.find_all_matching(filter).await?);
        }

        debug!(count = found.len(), "Vacation search done");
        Ok(found)
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Option<Vacation>, VacationError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn approve(&self, id: u64) -> Result<Vacation, VacationError> {
        self.transition(id, Status::Approved, Stage::Approval).await
    }

    pub async fn decline(&self, id: u64) -> Result<Vacation, VacationError> {
        self.transition(id, Status::Declined, Stage::Decline).await
    }

    async fn transition(
        &self,
        id: u64,
        target: Status,
        stage: Stage,
    ) -> Result<Vacation, VacationError> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| VacationError::NotFound {
                stage,
                reason: format!("Vacation({id}) not found"),
            })?;

        if current.status == target {
            warn!(id, status = %target, "Vacation already in requested status");
            return Err(VacationError::Conflict {
                stage,
                reason: format!("Vacation({id}) already {}", target.to_string().to_lowercase()),
            });
        }

        let from = current.status;
        let saved = self.store.save(current.with_status(target)).await?;
        info!(id, %from, to = %target, "Vacation status changed");
        Ok(saved)
    }
}
