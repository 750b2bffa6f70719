//! Create handler.
//!
//! `POST [base]/users`

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::models::CreateRequest;
use crate::state::AppState;

/// Handler for record creation.
///
/// # HTTP Request
///
/// `POST [base]/users`
///
/// # Response
///
/// - `201 Created` - `{"id": "<uuid>"}`
/// - `400 Bad Request` - Unparsable body
/// - `409 Conflict` - Identifier collision
///
/// # Example
///
/// ```http
/// POST /users HTTP/1.1
/// Content-Type: application/json
///
/// {"name": "Alice", "job": "Engineer", "childNames": ["Bob"], "comment": "n/a"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    JsonBody(request): JsonBody<CreateRequest>,
) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    debug!(name = %request.name, "Processing create request");

    let created = state.service().create(request).await?;

    debug!(id = %created.id, "User info created");

    Ok((StatusCode::CREATED, Json(created)).into_response())
}
