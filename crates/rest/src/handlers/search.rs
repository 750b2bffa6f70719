//! Search handlers.
//!
//! - `GET [base]/users-by?queryType=&key=&value=`
//! - `GET [base]/users-by-query?jsonQuery=`

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::debug;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::error::{RestError, RestResult};
use crate::extractors::QueryParams;
use crate::models::{FindByQueryRequest, FindByRequest};
use crate::state::AppState;

/// Handler for single-clause search.
///
/// # Response
///
/// - `200 OK` - Array of records, possibly empty
/// - `400 Bad Request` - Missing or blank parameter, unknown query type or key
pub async fn search_by_handler<S>(
    State(state): State<AppState<S>>,
    QueryParams(request): QueryParams<FindByRequest>,
) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    for (name, value) in [
        ("queryType", &request.query_type),
        ("key", &request.key),
        ("value", &request.value),
    ] {
        if value.trim().is_empty() {
            return Err(RestError::bad_request(format!(
                "query parameter '{}' is required",
                name
            )));
        }
    }

    debug!(
        query_type = %request.query_type,
        key = %request.key,
        value = %request.value,
        "Processing search request"
    );

    let found = state.service().find_by_key_and_value(request).await?;

    debug!(count = found.len(), "Search completed");

    Ok(Json(found).into_response())
}

/// Handler for raw query search.
///
/// The query document must be a JSON object using only the top-level keys
/// `query`, `size`, `from`, `sort`, `track_total_hits`, `min_score` and
/// `timeout`.
///
/// # Response
///
/// - `200 OK` - Array of records, possibly empty
/// - `400 Bad Request` - Missing, malformed or disallowed query document
pub async fn search_by_query_handler<S>(
    State(state): State<AppState<S>>,
    QueryParams(request): QueryParams<FindByQueryRequest>,
) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    debug!(json_query = %request.json_query, "Processing raw query search request");

    let found = state.service().find_by_query(&request.json_query).await?;

    debug!(count = found.len(), "Search completed");

    Ok(Json(found).into_response())
}
