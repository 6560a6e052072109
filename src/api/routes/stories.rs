//! Best-stories handler.

use super::BestStoriesQuery;
use crate::api::AppState;
use crate::error::{ApiError, Error};
use crate::types::StoryView;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio_util::sync::CancellationToken;

/// Header advertising the API version on successful responses
pub const API_VERSION_HEADER: &str = "x-api-version";

/// Value of [`API_VERSION_HEADER`]
pub const API_VERSION: &str = "1.0";

/// GET /stories/best - Top stories ranked by score
#[utoipa::path(
    get,
    path = "/api/v1/stories/best",
    tag = "stories",
    params(BestStoriesQuery),
    responses(
        (status = 200, description = "Stories ordered by score, highest first", body = Vec<StoryView>),
        (status = 400, description = "limit is not an integer between 1 and 100", body = crate::error::ApiError),
        (status = 429, description = "Rate limit exceeded", body = crate::error::ApiError),
        (status = 504, description = "Request deadline elapsed", body = crate::error::ApiError)
    )
)]
pub async fn best_stories(
    State(state): State<AppState>,
    query: Result<Query<BestStoriesQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::validation(rejection.body_text())),
            )
                .into_response();
        }
    };

    let limit = query.limit.unwrap_or(state.config.ranking.default_limit);
    let deadline = state.config.server.api.request_timeout;

    // Dropping the handler future (client went away) cancels outstanding lookups
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result =
        match tokio::time::timeout(deadline, state.aggregator.best_stories(limit, &cancel)).await
        {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                tracing::warn!(
                    limit,
                    deadline = ?deadline,
                    "Best stories request exceeded its deadline"
                );
                Err(Error::Cancelled)
            }
        };

    match result {
        Ok(items) => {
            let stories: Vec<StoryView> = items.iter().map(StoryView::from).collect();
            ([(API_VERSION_HEADER, API_VERSION)], Json(stories)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
