//! Update handler.
//!
//! `PUT [base]/users/{id}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::models::UpdateRequest;
use crate::state::AppState;

/// Handler for record update.
///
/// Replaces the record's fields; the creation timestamp is kept.
///
/// # Response
///
/// - `204 No Content` - Updated
/// - `400 Bad Request` - Unparsable body
/// - `500 Internal Server Error` - No record under the identifier, or a storage failure
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateRequest>,
) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    debug!(id = %id, "Processing update request");

    state.service().update(&id, request).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
