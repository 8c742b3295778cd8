use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_competition, delete_competition, get_competition, list_competitions,
    update_competition,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_competition))
        .route(
            "/:competition_id",
            put(update_competition).delete(delete_competition),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_competitions))
        .route("/:competition_id", get(get_competition))
        .merge(protected)
}
