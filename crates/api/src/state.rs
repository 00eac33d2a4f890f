use std::sync::Arc;

use ladder_core::store::ScoreStore;

use crate::cache::QueryCache;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Score store the leaderboard is ranked from.
    pub store: Arc<dyn ScoreStore>,
    /// Cache of serialized leaderboard pages.
    pub cache: Arc<QueryCache>,
}
