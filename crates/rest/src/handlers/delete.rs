//! Delete handler.
//!
//! `DELETE [base]/users/{id}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::error::RestResult;
use crate::models::DeleteRequest;
use crate::state::AppState;

/// Handler for record deletion.
///
/// # Response
///
/// - `204 No Content` - Deleted
/// - `500 Internal Server Error` - No record under the identifier, or a storage failure
///
/// # Example
///
/// ```http
/// DELETE /users/4f1c0e0a-8a4e-4d0c-9f0e-2b1d1f3f8a11 HTTP/1.1
/// ```
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    debug!(id = %id, "Processing delete request");

    state.service().delete(DeleteRequest { id }).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
