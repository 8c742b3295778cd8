use axum::{Router, routing::get};

use super::handlers::{competition_results_stream, cup_stream};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/competitions/:competition_id/results",
            get(competition_results_stream),
        )
        .route("/cup", get(cup_stream))
}
