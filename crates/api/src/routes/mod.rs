pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the leaderboard route tree.
///
/// Mounted both at the root and under `/api/v1`.
///
/// ```text
/// /accounts        ranked listing (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/accounts", get(handlers::leaderboard::list_accounts))
}
