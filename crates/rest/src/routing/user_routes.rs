//! User info route configuration.

use axum::{
    Router,
    routing::{get, post, put},
};
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::handlers;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// - `POST /users` - Create
/// - `GET /users?id=` - Read
/// - `PUT /users/{id}` - Update
/// - `DELETE /users/{id}` - Delete
/// - `GET /users-by?queryType=&key=&value=` - Key/value search
/// - `GET /users-by-query?jsonQuery=` - Raw query search
/// - `GET /health`, `GET /_liveness`, `GET /_readiness` - Probes
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: UserInfoStorage + UserInfoSearch + 'static,
{
    Router::new()
        // Probes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        // Records
        .route(
            "/users",
            post(handlers::create_handler::<S>).get(handlers::read_handler::<S>),
        )
        .route(
            "/users/{id}",
            put(handlers::update_handler::<S>).delete(handlers::delete_handler::<S>),
        )
        // Search
        .route("/users-by", get(handlers::search_by_handler::<S>))
        .route(
            "/users-by-query",
            get(handlers::search_by_query_handler::<S>),
        )
        // State
        .with_state(state)
}
