pub mod calculator;
pub mod foods;

use axum::{extract::Path, routing::get, Json, Router};
use tracing::instrument;

use crate::state::AppState;
use foods::{recommendations, FoodSuggestion, Macro};

pub fn router() -> Router<AppState> {
    Router::new().route("/nutrition/foods/:macro", get(list_foods))
}

#[instrument]
pub async fn list_foods(Path(kind): Path<Macro>) -> Json<&'static [FoodSuggestion]> {
    Json(recommendations(kind))
}
