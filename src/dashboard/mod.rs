pub mod summary;

use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::{error::ApiError, state::AppState, weights::services};
use summary::{summarize, DashboardSummary};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let entries = services::list_weights(state.store.as_ref(), &state.config.owner)
        .await
        .map_err(|e| {
            error!(error = %e, "dashboard load failed");
            ApiError::opaque("Failed to load dashboard")
        })?;
    Ok(Json(summarize(
        &entries,
        OffsetDateTime::now_utc(),
        state.config.display_offset,
    )))
}
