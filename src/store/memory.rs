use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{StoreError, VacationStore};
use crate::model::vacation::Vacation;

#[derive(Default)]
struct Table {
    rows: BTreeMap<u64, Vacation>,
    last_id: u64,
}

/// Process-local store; ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryVacationStore {
    table: RwLock<Table>,
}

impl InMemoryVacationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Unavailable("vacation table lock poisoned".to_string())
    }
}

#[async_trait]
impl VacationStore for InMemoryVacationStore {
    async fn create(&self, vacation: Vacation) -> Result<Vacation, StoreError> {
        let mut guard = self.table.write().map_err(Self::poisoned)?;
        let table = &mut *guard;
        table.last_id += 1;
        let stored = Vacation {
            id: Some(table.last_id),
            ..vacation
        };
        table.rows.insert(table.last_id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Vacation>, StoreError> {
        let table = self.table.read().map_err(Self::poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_all_ordered_by_id(&self) -> Result<Vec<Vacation>, StoreError> {
        let table = self.table.read().map_err(Self::poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_all_matching(&self, fragment: &str) -> Result<Vec<Vacation>, StoreError> {
        let needle = fragment.to_lowercase();
        let table = self.table.read().map_err(Self::poisoned)?;
        Ok(table
            .rows
            .values()
            .filter(|v| v.username.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn save(&self, vacation: Vacation) -> Result<Vacation, StoreError> {
        let Some(id) = vacation.id else {
            return self.create(vacation).await;
        };

        let mut guard = self.table.write().map_err(Self::poisoned)?;
        let table = &mut *guard;
        table.last_id = table.last_id.max(id);
        table.rows.insert(id, vacation.clone());
        Ok(vacation)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut table = self.table.write().map_err(Self::poisoned)?;
        table.rows.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vacation(username: &str) -> Vacation {
        Vacation {
            username: username.to_string(),
            ..Vacation::default()
        }
    }

    #[actix_web::test]
    async fn create_assigns_increasing_ids() {
        let store = InMemoryVacationStore::new();

        let first = store.create(vacation("ololo")).await.unwrap();
        let second = store.create(vacation("trololo")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[actix_web::test]
    async fn matching_ignores_case_and_keeps_id_order() {
        let store = InMemoryVacationStore::new();
        for name in ["ololo", "trololo", "nonono"] {
            store.create(vacation(name)).await.unwrap();
        }

        let found = store.find_all_matching("OLOLO").await.unwrap();
        let names: Vec<_> = found.iter().map(|v| v.username.as_str()).collect();
        assert_eq!(names, ["ololo", "trololo"]);

        let all = store.find_all_matching("").await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[actix_web::test]
    async fn save_overwrites_existing_row() {
        let store = InMemoryVacationStore::new();
        let created = store.create(vacation("daggerok")).await.unwrap();

        let updated = Vacation {
            hours: 8,
            ..created.clone()
        };
        store.save(updated).await.unwrap();

        let fetched = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(fetched.hours, 8);
        assert_eq!(store.find_all_ordered_by_id().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn ids_are_not_reused_after_delete_all() {
        let store = InMemoryVacationStore::new();
        store.create(vacation("a")).await.unwrap();
        store.delete_all().await.unwrap();

        assert!(store.find_all_ordered_by_id().await.unwrap().is_empty());
        let next = store.create(vacation("b")).await.unwrap();
        assert_eq!(next.id, Some(2));
    }
}
