//! # userinfo-rest - HTTP API for user info documents
//!
//! This crate exposes create, read, update, delete and search operations over
//! user info records kept in a search engine.
//!
//! ## Backend Support
//!
//! Storage backends are configured through feature flags:
//!
//! - `elasticsearch` - the production backend (default)
//! - `memory` - in-process backend for tests and local development (default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use userinfo_rest::{create_app, ServerConfig};
//! use userinfo_persistence::backends::memory::MemoryBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = create_app(MemoryBackend::new());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8084").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern | Success |
//! |-----------|-------------|-------------|---------|
//! | create | POST | `/users` | 201 `{"id": "<uuid>"}` |
//! | read | GET | `/users?id=` | 200 record |
//! | update | PUT | `/users/{id}` | 204 |
//! | delete | DELETE | `/users/{id}` | 204 |
//! | key/value search | GET | `/users-by?queryType=&key=&value=` | 200 records |
//! | raw query search | GET | `/users-by-query?jsonQuery=` | 200 records |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` | 200 / 503 |
//!
//! ## Error Handling
//!
//! All errors are returned as `{"message": "<text>"}`:
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | Unparsable body, missing parameter, rejected query |
//! | 409 | Identifier collision on create |
//! | 500 | Anything else, including a missing record or a storage timeout |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and status mapping
//! - [`config`] - Server configuration
//! - [`models`] - Request and response bodies
//! - [`service`] - Record assembly and mapping
//! - [`state`] - Application state
//! - [`extractors`] - Request extractors with JSON rejections
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routing;
pub mod service;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use service::UserInfoService;
pub use state::AppState;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: UserInfoStorage + UserInfoSearch + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use userinfo_rest::{create_app_with_config, ServerConfig};
/// use userinfo_persistence::backends::memory::MemoryBackend;
///
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(MemoryBackend::new(), config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: UserInfoStorage + UserInfoSearch + 'static,
{
    create_app_with_shared_storage(Arc::new(storage), config)
}

/// Creates the Axum application over storage the caller keeps a handle to.
pub fn create_app_with_shared_storage<S>(storage: Arc<S>, config: ServerConfig) -> Router
where
    S: UserInfoStorage + UserInfoSearch + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    let state = AppState::new(storage, config.clone());

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = if config.enable_compression {
        router.layer(CompressionLayer::new().gzip(true))
    } else {
        router
    };

    router
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(service_builder)
}

/// Builds the CORS layer from the comma-separated lists in the configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new();

    let cors = match comma_list::<HeaderValue>(&config.cors_origins) {
        Some(origins) => cors.allow_origin(origins),
        None => cors.allow_origin(Any),
    };
    let cors = match comma_list::<Method>(&config.cors_methods) {
        Some(methods) => cors.allow_methods(methods),
        None => cors.allow_methods(Any),
    };
    match comma_list::<HeaderName>(&config.cors_headers) {
        Some(headers) => cors.allow_headers(headers),
        None => cors.allow_headers(Any),
    }
}

/// Parses a comma-separated setting. `*` means any and yields `None`;
/// unparsable entries are dropped.
fn comma_list<T: FromStr>(value: &str) -> Option<Vec<T>> {
    if value.trim() == "*" {
        return None;
    }
    Some(
        value
            .split(',')
            .filter_map(|item| item.trim().parse().ok())
            .collect(),
    )
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// the level when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "userinfo_rest={level},userinfo_persistence={level},userinfo_server={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
