use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_score, delete_score, get_score, list_scores, list_station_scores, update_score,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_score))
        .route("/:score_id", put(update_score).delete(delete_score))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_scores))
        .route("/station", get(list_station_scores))
        .route("/:score_id", get(get_score))
        .merge(protected)
}
