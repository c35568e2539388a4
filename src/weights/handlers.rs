use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument, warn};

use crate::{
    error::{ApiError, AppError},
    state::AppState,
};

use super::dto::{CreateWeightRequest, WeightListItem};
use super::repo_types::WeightEntry;
use super::services;

pub fn weight_routes() -> Router<AppState> {
    Router::new().route("/weights", get(list_weights).post(create_weight))
}

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeightListItem>>, ApiError> {
    let rows = services::list_weights(state.store.as_ref(), &state.config.owner)
        .await
        .map_err(|e| {
            error!(error = %e, "list weights failed");
            ApiError::opaque("Failed to fetch weights")
        })?;
    Ok(Json(rows.into_iter().map(WeightListItem::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_weight(
    State(state): State<AppState>,
    payload: Result<Json<CreateWeightRequest>, JsonRejection>,
) -> Result<Json<WeightEntry>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(error = %rejection, "malformed weight body");
        ApiError::bad_request("Failed to add weight", rejection.body_text())
    })?;
    let at = body.date.unwrap_or_else(OffsetDateTime::now_utc);
    let entry = services::record_weight(
        state.store.as_ref(),
        &state.config.owner,
        body.weight.as_ref(),
        at,
    )
    .await
    .map_err(|e| {
        match &e {
            AppError::Validation(v) => warn!(error = %v, "rejected weight"),
            AppError::Storage(s) => error!(error = %s, "record weight failed"),
        }
        ApiError::detailed("Failed to add weight", e)
    })?;
    Ok(Json(entry))
}
