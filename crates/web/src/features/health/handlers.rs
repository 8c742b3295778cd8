use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use storage::Database;
use utoipa::ToSchema;

use crate::live::FeedRegistry;

use super::services;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    pub database: bool,
    /// Views currently streamed to at least one client.
    pub live_feeds: usize,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(
    State(db): State<Database>,
    State(feeds): State<FeedRegistry>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = services::database_reachable(db.pool()).await;
    let (code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            database,
            live_feeds: feeds.active_feeds(),
        }),
    )
}
