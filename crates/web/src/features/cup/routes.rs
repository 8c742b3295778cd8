use axum::{Router, routing::get};

use super::handlers::{export_cup, get_cup};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cup))
        .route("/export", get(export_cup))
}
