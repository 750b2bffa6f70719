//! Server configuration for the user info API.
//!
//! Every option can be given on the command line or through an environment
//! variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `USERINFO_SERVER_PORT` | 8084 | Server port |
//! | `USERINFO_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `USERINFO_LOG_LEVEL` | info | Log level |
//! | `USERINFO_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `USERINFO_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `USERINFO_ENABLE_CORS` | true | Enable CORS |
//! | `USERINFO_CORS_ORIGINS` | * | Allowed origins |
//! | `USERINFO_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `USERINFO_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `USERINFO_ENABLE_COMPRESSION` | true | Gzip responses |
//! | `USERINFO_STORAGE_BACKEND` | elasticsearch | `elasticsearch` or `memory` |
//! | `USERINFO_ES_NODES` | http://localhost:9200 | Comma-separated node URLs |
//! | `USERINFO_ES_USERNAME` / `USERINFO_ES_PASSWORD` | | Basic auth |
//! | `USERINFO_ES_TOKEN` | | Bearer auth |
//! | `USERINFO_ES_INDEX` | user | Concrete index |
//! | `USERINFO_ES_ALIAS` | user_alias | Alias every call targets |
//! | `USERINFO_ES_TIMEOUT_MS` | 10000 | Per-call storage timeout |
//! | `USERINFO_ES_INSECURE` | false | Skip certificate validation |
//! | `USERINFO_MAX_RESULT_WINDOW` | 10000 | Cap on raw query `size` |
//!
//! # Example
//!
//! ```rust
//! use userinfo_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// The Elasticsearch adapter.
    Elasticsearch,
    /// The in-process backend. Data is lost on restart.
    Memory,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Elasticsearch => write!(f, "elasticsearch"),
            StorageBackendMode::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elasticsearch" | "es" => Ok(StorageBackendMode::Elasticsearch),
            "memory" => Ok(StorageBackendMode::Memory),
            other => Err(format!(
                "unknown storage backend '{}', expected 'elasticsearch' or 'memory'",
                other
            )),
        }
    }
}

/// Server configuration for the user info API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "userinfo-server")]
#[command(about = "User info search API over Elasticsearch")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "USERINFO_SERVER_PORT", default_value = "8084")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "USERINFO_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "USERINFO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "USERINFO_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "USERINFO_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "USERINFO_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "USERINFO_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "USERINFO_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "USERINFO_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Gzip-compress responses when the client accepts it.
    #[arg(long, env = "USERINFO_ENABLE_COMPRESSION", default_value = "true")]
    pub enable_compression: bool,

    /// Storage backend (`elasticsearch` or `memory`).
    #[arg(long, env = "USERINFO_STORAGE_BACKEND", default_value = "elasticsearch")]
    pub storage_backend: String,

    /// Elasticsearch node URLs (comma-separated).
    #[arg(long, env = "USERINFO_ES_NODES", default_value = "http://localhost:9200")]
    pub elasticsearch_nodes: String,

    /// Elasticsearch basic auth username.
    #[arg(long, env = "USERINFO_ES_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch basic auth password.
    #[arg(long, env = "USERINFO_ES_PASSWORD")]
    pub elasticsearch_password: Option<String>,

    /// Elasticsearch bearer token. Takes precedence over basic auth.
    #[arg(long, env = "USERINFO_ES_TOKEN")]
    pub elasticsearch_token: Option<String>,

    /// Concrete index holding the documents.
    #[arg(long, env = "USERINFO_ES_INDEX", default_value = "user")]
    pub elasticsearch_index: String,

    /// Alias targeted by every document operation and search.
    #[arg(long, env = "USERINFO_ES_ALIAS", default_value = "user_alias")]
    pub elasticsearch_alias: String,

    /// Per-call storage timeout in milliseconds.
    #[arg(long, env = "USERINFO_ES_TIMEOUT_MS", default_value = "10000")]
    pub elasticsearch_timeout_ms: u64,

    /// Skip TLS certificate validation. Development only.
    #[arg(long, env = "USERINFO_ES_INSECURE", default_value = "false")]
    pub elasticsearch_insecure: bool,

    /// Cap applied to the `size` of raw queries.
    #[arg(long, env = "USERINFO_MAX_RESULT_WINDOW", default_value = "10000")]
    pub max_result_window: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8084,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            enable_compression: true,
            storage_backend: "elasticsearch".to_string(),
            elasticsearch_nodes: "http://localhost:9200".to_string(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            elasticsearch_token: None,
            elasticsearch_index: "user".to_string(),
            elasticsearch_alias: "user_alias".to_string(),
            elasticsearch_timeout_ms: 10000,
            elasticsearch_insecure: false,
            max_result_window: 10000,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the configured Elasticsearch node URLs.
    pub fn elasticsearch_node_list(&self) -> Vec<String> {
        self.elasticsearch_nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Builds the Elasticsearch backend configuration.
    #[cfg(feature = "elasticsearch")]
    pub fn elasticsearch_config(
        &self,
    ) -> userinfo_persistence::backends::elasticsearch::ElasticsearchConfig {
        use userinfo_persistence::backends::elasticsearch::{
            ElasticsearchAuth, ElasticsearchConfig,
        };

        let auth = match (
            &self.elasticsearch_token,
            &self.elasticsearch_username,
            &self.elasticsearch_password,
        ) {
            (Some(token), _, _) => Some(ElasticsearchAuth::Bearer {
                token: token.clone(),
            }),
            (None, Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        ElasticsearchConfig {
            nodes: self.elasticsearch_node_list(),
            index: self.elasticsearch_index.clone(),
            alias: self.elasticsearch_alias.clone(),
            max_result_window: self.max_result_window,
            request_timeout_ms: self.elasticsearch_timeout_ms,
            auth,
            disable_certificate_validation: self.elasticsearch_insecure,
            ..Default::default()
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e);
        }

        if self.elasticsearch_node_list().is_empty() {
            errors.push("At least one Elasticsearch node is required".to_string());
        }

        if self.elasticsearch_index.trim().is_empty() {
            errors.push("Elasticsearch index cannot be empty".to_string());
        }

        if self.elasticsearch_alias.trim().is_empty() {
            errors.push("Elasticsearch alias cannot be empty".to_string());
        }

        if self.elasticsearch_alias == self.elasticsearch_index {
            errors.push("Elasticsearch alias must differ from the index name".to_string());
        }

        if self.elasticsearch_timeout_ms == 0 {
            errors.push("Elasticsearch timeout cannot be 0".to_string());
        }

        if self.elasticsearch_username.is_some() != self.elasticsearch_password.is_some() {
            errors.push(
                "Elasticsearch username and password must be given together".to_string(),
            );
        }

        if self.max_result_window == 0 {
            errors.push("Max result window cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, the memory backend, and disables features
    /// that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            enable_compression: false,
            storage_backend: "memory".to_string(),
            ..Default::default()
        }
    }
}
