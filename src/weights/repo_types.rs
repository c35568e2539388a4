use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Owner profile row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub birth_date: Option<OffsetDateTime>,
    pub height: Option<f64>, // inches
    pub created_at: OffsetDateTime,
}

/// Row inserted into `weights`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: Uuid,
    pub weight: f64, // pounds
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub user_id: Uuid,
}

/// Weight row joined with the owner's profile.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WeightWithProfileRow {
    pub id: Uuid,
    pub weight: f64,
    pub date: OffsetDateTime,
    pub birth_date: Option<OffsetDateTime>,
    pub height: Option<f64>,
}
