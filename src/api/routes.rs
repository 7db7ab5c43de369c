use axum::{
    routing::get,
    Router,
    extract::{Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::api::models::{ScrapeQuery, ScrapeResponse, StatusResponse};
use crate::api::response;
use crate::auth::authorize;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/scrape", get(scrape_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.quota.snapshot();

    response::success(StatusResponse {
        status: "success",
        current_request_count: snapshot.count,
        request_limit: snapshot.limit,
        remaining_time_to_reset: snapshot.remaining.as_secs_f64(),
    })
}

async fn scrape_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Option<Query<ScrapeQuery>>,
) -> Result<impl IntoResponse> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !authorize(auth_header, &state.config.bearer_token) {
        warn!("rejected scrape request with missing or invalid bearer token");
        return Err(AppError::Unauthorized);
    }

    if let Err(exceeded) = state.quota.check() {
        warn!(retry_after_secs = exceeded.retry_after_secs(), "request limit reached");
        return Err(exceeded.into());
    }

    // A malformed query string is treated the same as a missing `url`.
    let url = query
        .as_ref()
        .and_then(|Query(query)| query.target())
        .ok_or(AppError::MissingUrl)?;

    // Re-checks the ceiling under the same lock, so a request that raced
    // past `check` above can still be turned away here.
    let count = state.quota.try_acquire()?;
    info!(%url, request_count = count, "scraping page");

    let html = state.fetcher.fetch(url).await.map_err(|err| {
        warn!(%url, error = %err, "fetch failed");
        AppError::from(err)
    })?;

    let result = state.extractor.extract(&html);
    info!(
        %url,
        links = result.links.as_ref().map_or(0, Vec::len),
        images = result.images.as_ref().map_or(0, Vec::len),
        "extracted page"
    );

    Ok(response::success(ScrapeResponse::new(url, result)))
}
