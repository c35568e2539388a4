use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::config::{OwnerConfig, ProvisionPolicy};
use crate::error::{AppError, StorageError, ValidationError};
use crate::weights::dto::WeightInput;
use crate::weights::repo::WeightStore;
use crate::weights::repo_types::{User, WeightEntry, WeightWithProfileRow};

/// Exclusive lower bound.
pub const MIN_WEIGHT_LBS: f64 = 0.0;
/// Inclusive upper bound.
pub const MAX_WEIGHT_LBS: f64 = 1500.0;

/// A validated body weight in pounds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Pounds(f64);

impl Pounds {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite);
        }
        if value <= MIN_WEIGHT_LBS || value > MAX_WEIGHT_LBS {
            return Err(ValidationError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

fn is_plain_decimal(s: &str) -> bool {
    lazy_static! {
        static ref DECIMAL_RE: Regex = Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").unwrap();
    }
    DECIMAL_RE.is_match(s)
}

/// Only plain decimal text is accepted; `"NaN"`, `"inf"` and exponents are not.
pub fn parse_weight(input: Option<&WeightInput>) -> Result<Pounds, ValidationError> {
    match input {
        None => Err(ValidationError::Missing),
        Some(WeightInput::Number(v)) => Pounds::new(*v),
        Some(WeightInput::Text(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Missing);
            }
            if !is_plain_decimal(trimmed) {
                return Err(ValidationError::NotANumber(raw.clone()));
            }
            let value = trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::NotANumber(raw.clone()))?;
            Pounds::new(value)
        }
    }
}

async fn ensure_owner(store: &dyn WeightStore, owner: &OwnerConfig) -> Result<User, StorageError> {
    match &owner.provision {
        ProvisionPolicy::AutoCreate(profile) => store.ensure_user(owner.id, profile).await,
        ProvisionPolicy::Disabled => store
            .find_user(owner.id)
            .await?
            .ok_or(StorageError::UnknownUser(owner.id)),
    }
}

pub async fn list_weights(
    store: &dyn WeightStore,
    owner: &OwnerConfig,
) -> Result<Vec<WeightWithProfileRow>, StorageError> {
    let rows = store.list_weights(owner.id).await?;
    debug!(user_id = %owner.id, count = rows.len(), "weights listed");
    Ok(rows)
}

/// Validates `input`, makes sure the owner exists, then stores the entry at `at`.
pub async fn record_weight(
    store: &dyn WeightStore,
    owner: &OwnerConfig,
    input: Option<&WeightInput>,
    at: OffsetDateTime,
) -> Result<WeightEntry, AppError> {
    let weight = parse_weight(input)?;
    let user = ensure_owner(store, owner).await?;
    let entry = store.insert_weight(user.id, weight.value(), at).await?;
    info!(user_id = %user.id, entry_id = %entry.id, weight = entry.weight, "weight recorded");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultProfile;
    use crate::weights::memory::MemoryWeightStore;
    use time::macros::datetime;
    use uuid::Uuid;

    fn owner(provision: ProvisionPolicy) -> OwnerConfig {
        OwnerConfig {
            id: Uuid::new_v4(),
            provision,
        }
    }

    fn auto() -> OwnerConfig {
        owner(ProvisionPolicy::AutoCreate(DefaultProfile::default()))
    }

    fn text(s: &str) -> WeightInput {
        WeightInput::Text(s.to_string())
    }

    #[test]
    fn parses_numbers_and_decimal_text() {
        assert_eq!(parse_weight(Some(&WeightInput::Number(150.5))).unwrap().value(), 150.5);
        assert_eq!(parse_weight(Some(&text("150.5"))).unwrap().value(), 150.5);
        assert_eq!(parse_weight(Some(&text(" 200 "))).unwrap().value(), 200.0);
        assert_eq!(parse_weight(Some(&text(".5"))).unwrap().value(), 0.5);
        assert_eq!(parse_weight(Some(&text("181."))).unwrap().value(), 181.0);
    }

    #[test]
    fn rejects_non_numeric_text() {
        for raw in ["not-a-number", "NaN", "inf", "1e3", "150,5", "12abc"] {
            assert_eq!(
                parse_weight(Some(&text(raw))),
                Err(ValidationError::NotANumber(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_missing_and_blank() {
        assert_eq!(parse_weight(None), Err(ValidationError::Missing));
        assert_eq!(parse_weight(Some(&text("   "))), Err(ValidationError::Missing));
    }

    #[test]
    fn enforces_range_and_finiteness() {
        assert_eq!(Pounds::new(f64::NAN), Err(ValidationError::NotFinite));
        assert_eq!(Pounds::new(f64::INFINITY), Err(ValidationError::NotFinite));
        assert_eq!(Pounds::new(0.0), Err(ValidationError::OutOfRange(0.0)));
        assert_eq!(Pounds::new(-10.0), Err(ValidationError::OutOfRange(-10.0)));
        assert_eq!(Pounds::new(1500.5), Err(ValidationError::OutOfRange(1500.5)));
        assert!(Pounds::new(MAX_WEIGHT_LBS).is_ok());
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = MemoryWeightStore::new();
        let rows = list_weights(&store, &auto()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn first_record_creates_user_and_entry() {
        let store = MemoryWeightStore::new();
        let owner = auto();
        let entry = record_weight(&store, &owner, Some(&text("150.5")), OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert_eq!(entry.user_id, owner.id);
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.weight_count(), 1);

        let rows = list_weights(&store, &owner).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weight, 150.5);
        assert_eq!(rows[0].birth_date, None);
        assert_eq!(rows[0].height, None);
    }

    #[tokio::test]
    async fn auto_created_user_gets_configured_profile() {
        let store = MemoryWeightStore::new();
        let owner = owner(ProvisionPolicy::AutoCreate(DefaultProfile {
            birth_date: Some(datetime!(1992-07-14 0:00 UTC)),
            height_in: Some(71.0),
        }));
        record_weight(&store, &owner, Some(&WeightInput::Number(190.0)), OffsetDateTime::now_utc())
            .await
            .unwrap();
        let rows = list_weights(&store, &owner).await.unwrap();
        assert_eq!(rows[0].birth_date, Some(datetime!(1992-07-14 0:00 UTC)));
        assert_eq!(rows[0].height, Some(71.0));
    }

    #[tokio::test]
    async fn invalid_weight_persists_nothing() {
        let store = MemoryWeightStore::new();
        let err = record_weight(&store, &auto(), Some(&text("not-a-number")), OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::NotANumber(_))));
        assert_eq!(store.user_count(), 0);
        assert_eq!(store.weight_count(), 0);
    }

    #[tokio::test]
    async fn entries_come_back_in_date_order() {
        let store = MemoryWeightStore::new();
        let owner = auto();
        record_weight(&store, &owner, Some(&text("182")), datetime!(2024-02-10 7:00 UTC))
            .await
            .unwrap();
        record_weight(&store, &owner, Some(&text("185")), datetime!(2024-02-01 7:00 UTC))
            .await
            .unwrap();
        record_weight(&store, &owner, Some(&text("183")), datetime!(2024-02-05 7:00 UTC))
            .await
            .unwrap();

        let weights: Vec<f64> = list_weights(&store, &owner)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.weight)
            .collect();
        assert_eq!(weights, vec![185.0, 183.0, 182.0]);
    }

    #[tokio::test]
    async fn same_instant_entries_are_ordered_by_id() {
        let store = MemoryWeightStore::new();
        let owner = auto();
        let at = datetime!(2024-02-10 7:00 UTC);
        for w in ["182", "181", "183", "180"] {
            record_weight(&store, &owner, Some(&text(w)), at).await.unwrap();
        }
        record_weight(&store, &owner, Some(&text("179")), datetime!(2024-02-09 7:00 UTC))
            .await
            .unwrap();

        let first = list_weights(&store, &owner).await.unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].weight, 179.0);
        let tied: Vec<Uuid> = first[1..].iter().map(|r| r.id).collect();
        let mut sorted = tied.clone();
        sorted.sort();
        assert_eq!(tied, sorted);

        let second = list_weights(&store, &owner).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn repeated_records_share_one_user() {
        let store = MemoryWeightStore::new();
        let owner = auto();
        for w in ["180", "179.5"] {
            record_weight(&store, &owner, Some(&text(w)), OffsetDateTime::now_utc())
                .await
                .unwrap();
        }
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.weight_count(), 2);
    }

    #[tokio::test]
    async fn disabled_provisioning_requires_existing_user() {
        let store = MemoryWeightStore::new();
        let owner = owner(ProvisionPolicy::Disabled);
        let err = record_weight(&store, &owner, Some(&text("170")), OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::UnknownUser(id)) if id == owner.id));
        assert_eq!(store.weight_count(), 0);

        store.ensure_user(owner.id, &DefaultProfile::default()).await.unwrap();
        record_weight(&store, &owner, Some(&text("170")), OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert_eq!(store.weight_count(), 1);
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let store = MemoryWeightStore::unavailable();
        let err = record_weight(&store, &auto(), Some(&text("170")), OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Database(_))));
    }
}
