use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::weights::repo_types::WeightWithProfileRow;

/// Weight as sent by clients: `150.5` or `"150.5"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct CreateWeightRequest {
    #[serde(default)]
    pub weight: Option<WeightInput>,
    /// Measurement time; submission time when absent.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(with = "time::serde::rfc3339::option")]
    pub birth_date: Option<OffsetDateTime>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightListItem {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub weight: f64,
    pub user: ProfileView,
}

impl From<WeightWithProfileRow> for WeightListItem {
    fn from(r: WeightWithProfileRow) -> Self {
        Self {
            date: r.date,
            weight: r.weight,
            user: ProfileView {
                birth_date: r.birth_date,
                height: r.height,
            },
        }
    }
}
