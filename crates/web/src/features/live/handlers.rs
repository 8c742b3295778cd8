use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::Stream;
use uuid::Uuid;

use crate::error::WebResult;
use crate::live::{FeedKey, FeedRegistry};

use super::services;

#[utoipa::path(
    get,
    path = "/api/live/competitions/{competition_id}/results",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Results of the competition, resent after every change", content_type = "text/event-stream", body = String),
        (status = 404, description = "Competition not found")
    ),
    tag = "live"
)]
pub async fn competition_results_stream(
    State(feeds): State<FeedRegistry>,
    Path(competition_id): Path<Uuid>,
) -> WebResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let key = FeedKey::CompetitionResults(competition_id);
    let subscription = feeds.open(key).await?;
    tracing::info!(%competition_id, consumers = feeds.consumers(key), "New live results connection");
    Ok(services::to_sse_stream(subscription))
}

#[utoipa::path(
    get,
    path = "/api/live/cup",
    responses(
        (status = 200, description = "Cup standings, resent after every change", content_type = "text/event-stream", body = String)
    ),
    tag = "live"
)]
pub async fn cup_stream(
    State(feeds): State<FeedRegistry>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = feeds.subscribe(FeedKey::Cup);
    tracing::info!(consumers = feeds.consumers(FeedKey::Cup), "New live cup connection");
    services::to_sse_stream(subscription)
}
