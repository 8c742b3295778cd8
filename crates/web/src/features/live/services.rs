use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;

use crate::live::{FeedPayload, FeedSubscription};

fn to_event(event_name: &'static str, payload: &FeedPayload) -> Option<Event> {
    match Event::default().event(event_name).json_data(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize live payload");
            None
        }
    }
}

/// Turn a feed subscription into an SSE response.
///
/// The subscription lives inside the stream; axum drops the stream when the
/// client disconnects, which detaches from the feed.
pub fn to_sse_stream(
    mut subscription: FeedSubscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let event_name = subscription.key().event_name();

    let stream = async_stream::stream! {
        while let Some(payload) = subscription.next().await {
            if let Some(event) = to_event(event_name, &payload) {
                yield Ok(event);
            }
        }
        tracing::debug!(key = ?subscription.key(), "Live feed closed");
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::results::CupStandings;

    #[test]
    fn test_payload_serializes_without_wrapper() {
        let payload = FeedPayload::Cup(CupStandings {
            competitions: Vec::new(),
            classes: Vec::new(),
        });

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json, serde_json::json!({"competitions": [], "classes": []}));
        assert!(to_event("cup", &payload).is_some());
    }
}
