//! Read handler.
//!
//! `GET [base]/users?id=`

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::debug;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::error::{RestError, RestResult};
use crate::extractors::QueryParams;
use crate::models::FindRequest;
use crate::state::AppState;

/// Handler for reading one record.
///
/// # Response
///
/// - `200 OK` - The record
/// - `400 Bad Request` - Missing or blank `id`
/// - `500 Internal Server Error` - No record under the identifier, or a storage failure
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    QueryParams(request): QueryParams<FindRequest>,
) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    if request.id.trim().is_empty() {
        return Err(RestError::bad_request("query parameter 'id' is required"));
    }

    debug!(id = %request.id, "Processing read request");

    let found = state.service().find(request).await?;

    Ok(Json(found).into_response())
}
