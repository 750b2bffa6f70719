//! Health check endpoint handlers.
//!
//! `/health` describes what the service searches; `/_liveness` and
//! `/_readiness` are the probes used by orchestrators.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};
use userinfo_persistence::types::{QueryType, SEARCHABLE_FIELDS};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Reports the backend, the index alias it targets (`null` for the memory
/// backend), the supported key/value query types and fields, and the raw
/// query size cap. Does not contact the backend.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    debug!("Processing health check request");

    let storage = state.storage();
    let body = json!({
        "status": "healthy",
        "backend": storage.backend_name(),
        "target": storage.target(),
        "queryTypes": QueryType::ALL.map(|qt| qt.as_str()),
        "searchableFields": SEARCHABLE_FIELDS,
        "maxResultWindow": state.config().max_result_window,
    });

    Ok(Json(body).into_response())
}

/// Handler for the liveness probe. Always `200 OK`.
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// - `200 OK` - the backend answered its health check
/// - `503 Service Unavailable` - it did not
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: UserInfoStorage + UserInfoSearch,
{
    let storage = state.storage();

    if let Err(e) = storage.health_check().await {
        return Err(RestError::ServiceUnavailable {
            message: format!("{} not ready: {}", storage.backend_name(), e),
        });
    }

    debug!(backend = storage.backend_name(), "Backend ready");

    Ok(Json(json!({ "status": "ready", "target": storage.target() })).into_response())
}
