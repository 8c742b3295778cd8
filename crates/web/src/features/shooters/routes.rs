use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_shooter, delete_shooter, get_shooter, list_shooters, search_shooters, update_shooter,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_shooter))
        .route("/:shooter_id", put(update_shooter).delete(delete_shooter))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_shooters))
        .route("/search", get(search_shooters))
        .route("/:shooter_id", get(get_shooter))
        .merge(protected)
}
