use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::DefaultProfile;
use crate::error::StorageError;
use crate::weights::repo_types::{User, WeightEntry, WeightWithProfileRow};

/// Persistence for owners and their weight entries.
#[async_trait]
pub trait WeightStore: Send + Sync {
    /// All entries of `user_id`, ascending by date, ties by id.
    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightWithProfileRow>, StorageError>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StorageError>;

    /// Creates the user with `profile` unless it already exists. Never
    /// touches an existing row.
    async fn ensure_user(&self, user_id: Uuid, profile: &DefaultProfile) -> Result<User, StorageError>;

    async fn insert_weight(
        &self,
        user_id: Uuid,
        weight: f64,
        date: OffsetDateTime,
    ) -> Result<WeightEntry, StorageError>;
}

#[derive(Clone)]
pub struct PgWeightStore {
    db: PgPool,
}

impl PgWeightStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WeightStore for PgWeightStore {
    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightWithProfileRow>, StorageError> {
        let rows = sqlx::query_as::<_, WeightWithProfileRow>(
            r#"
            SELECT w.id, w.weight, w.date, u.birth_date, u.height
            FROM weights w
            JOIN users u ON u.id = w.user_id
            WHERE w.user_id = $1
            ORDER BY w.date ASC, w.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, birth_date, height, created_at FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn ensure_user(&self, user_id: Uuid, profile: &DefaultProfile) -> Result<User, StorageError> {
        // Concurrent first writes race on the primary key; losers fall through to the select.
        sqlx::query(
            r#"
            INSERT INTO users (id, birth_date, height)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(profile.birth_date)
        .bind(profile.height_in)
        .execute(&self.db)
        .await?;

        self.find_user(user_id)
            .await?
            .ok_or(StorageError::UnknownUser(user_id))
    }

    async fn insert_weight(
        &self,
        user_id: Uuid,
        weight: f64,
        date: OffsetDateTime,
    ) -> Result<WeightEntry, StorageError> {
        let entry = sqlx::query_as::<_, WeightEntry>(
            r#"
            INSERT INTO weights (id, weight, date, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, weight, date, user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(weight)
        .bind(date)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(entry)
    }
}
