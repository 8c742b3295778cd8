use axum::{Router, routing::get};

use super::handlers::{export_competition_results, get_competition_results};
use crate::state::AppState;

/// Mounted under `/competitions`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:competition_id/results", get(get_competition_results))
        .route(
            "/:competition_id/results/export",
            get(export_competition_results),
        )
}
