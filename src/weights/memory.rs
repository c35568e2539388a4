use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::DefaultProfile;
use crate::error::StorageError;
use crate::weights::repo::WeightStore;
use crate::weights::repo_types::{User, WeightEntry, WeightWithProfileRow};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    weights: Vec<WeightEntry>,
}

/// In-process store for tests. `unavailable()` fails every call like a dead pool.
#[derive(Default)]
pub struct MemoryWeightStore {
    tables: Mutex<Tables>,
    unavailable: bool,
}

impl MemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn weight_count(&self) -> usize {
        self.tables.lock().unwrap().weights.len()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl WeightStore for MemoryWeightStore {
    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightWithProfileRow>, StorageError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<WeightWithProfileRow> = tables
            .weights
            .iter()
            .filter(|w| w.user_id == user_id)
            .filter_map(|w| {
                tables.users.get(&w.user_id).map(|u| WeightWithProfileRow {
                    id: w.id,
                    weight: w.weight,
                    date: w.date,
                    birth_date: u.birth_date,
                    height: u.height,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StorageError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn ensure_user(&self, user_id: Uuid, profile: &DefaultProfile) -> Result<User, StorageError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let user = tables.users.entry(user_id).or_insert_with(|| User {
            id: user_id,
            birth_date: profile.birth_date,
            height: profile.height_in,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(user.clone())
    }

    async fn insert_weight(
        &self,
        user_id: Uuid,
        weight: f64,
        date: OffsetDateTime,
    ) -> Result<WeightEntry, StorageError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.contains_key(&user_id) {
            // Mirrors the foreign key on weights.user_id.
            return Err(StorageError::UnknownUser(user_id));
        }
        let entry = WeightEntry {
            id: Uuid::new_v4(),
            weight,
            date,
            user_id,
        };
        tables.weights.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[tokio::test]
    async fn ensure_user_keeps_existing_profile() {
        let store = MemoryWeightStore::new();
        let id = Uuid::new_v4();
        let first = DefaultProfile {
            birth_date: Some(datetime!(1985-05-05 0:00 UTC)),
            height_in: Some(70.0),
        };
        store.ensure_user(id, &first).await.unwrap();
        let again = store
            .ensure_user(id, &DefaultProfile::default())
            .await
            .unwrap();
        assert_eq!(again.height, Some(70.0));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn list_only_returns_owner_entries() {
        let store = MemoryWeightStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.ensure_user(a, &DefaultProfile::default()).await.unwrap();
        store.ensure_user(b, &DefaultProfile::default()).await.unwrap();
        store
            .insert_weight(a, 170.0, datetime!(2024-01-01 8:00 UTC))
            .await
            .unwrap();
        store
            .insert_weight(b, 210.0, datetime!(2024-01-01 8:00 UTC))
            .await
            .unwrap();

        let rows = store.list_weights(a).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weight, 170.0);
    }

    #[tokio::test]
    async fn unavailable_store_fails() {
        let store = MemoryWeightStore::unavailable();
        let err = store.list_weights(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
    }
}
