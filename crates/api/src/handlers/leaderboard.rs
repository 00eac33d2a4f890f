//! Handler for the ranked account listing.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderName;
use axum::response::{IntoResponse, Response};
use ladder_core::cache_key;
use ladder_core::leaderboard::{self, LeaderboardParams};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response header reporting whether the page came from the cache.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// GET /accounts
///
/// Ranked, filtered, paginated leaderboard. Validation failures on `page`
/// or `limit` are rejected before the cache or store is touched. A repeated
/// parameter keeps its first value.
pub async fn list_accounts(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Response> {
    let Query(pairs) = pairs.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let params = LeaderboardParams::from_pairs(pairs);

    let query = leaderboard::resolve(&params)?;
    let key = cache_key::derive(&params, &query);

    let store = Arc::clone(&state.store);
    let (payload, hit) = state
        .cache
        .fetch(&key, move || async move {
            let page = leaderboard::fetch_page(store.as_ref(), &query).await?;
            let body = serde_json::to_vec(&page)
                .map_err(|e| AppError::InternalError(format!("serialize page: {e}")))?;
            Ok::<_, AppError>(Bytes::from(body))
        })
        .await?;

    tracing::debug!(cache_key = %key, hit, "Serving leaderboard page");

    let cache_status = if hit { "HIT" } else { "MISS" };
    Ok((
        [
            (CONTENT_TYPE, "application/json"),
            (CACHE_STATUS_HEADER, cache_status),
        ],
        payload,
    )
        .into_response())
}
