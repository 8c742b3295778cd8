use axum::extract::FromRef;
use storage::Database;

use crate::live::{ChangeBus, FeedRegistry};

/// Shared state handed to every router. Each handler extracts only the part it needs.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub changes: ChangeBus,
    pub feeds: FeedRegistry,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for ChangeBus {
    fn from_ref(state: &AppState) -> Self {
        state.changes.clone()
    }
}

impl FromRef<AppState> for FeedRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.feeds.clone()
    }
}
