//! Client construction and configuration for the Elasticsearch backend.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, StorageError, StorageResult};

pub(crate) const BACKEND_NAME: &str = "elasticsearch";

const DEFAULT_NODE: &str = "http://localhost:9200";

/// Credentials sent with every request to the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// HTTP basic credentials.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// An `Authorization: Bearer` token.
    Bearer {
        /// Token value.
        token: String,
    },
}

/// Where the user info index lives and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Cluster node URLs. Only the first one is used.
    pub nodes: Vec<String>,

    /// Concrete index holding the documents (default: `"user"`).
    #[serde(default = "default_index")]
    pub index: String,

    /// Alias targeted by every document operation and search (default: `"user_alias"`).
    #[serde(default = "default_alias")]
    pub alias: String,

    /// Number of primary shards for the index (default: 1).
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,

    /// Number of replica shards for the index (default: 1).
    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,

    /// Index refresh interval (default: `"1s"`).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    /// Maximum result window size; raw query `size` is capped to it (default: 10000).
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u32,

    /// Per-call timeout in milliseconds (default: 10000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Skip TLS certificate validation. Development clusters only.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_index() -> String {
    "user".to_string()
}

fn default_alias() -> String {
    "user_alias".to_string()
}

fn default_shards() -> u32 {
    1
}

fn default_replicas() -> u32 {
    1
}

fn default_refresh_interval() -> String {
    "1s".to_string()
}

fn default_max_result_window() -> u32 {
    10000
}

fn default_request_timeout_ms() -> u64 {
    10000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec![DEFAULT_NODE.to_string()],
            index: default_index(),
            alias: default_alias(),
            number_of_shards: default_shards(),
            number_of_replicas: default_replicas(),
            refresh_interval: default_refresh_interval(),
            max_result_window: default_max_result_window(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// Elasticsearch backend for user info documents.
///
/// Holds an immutable client handle and its configuration; it is shared
/// across requests without locking.
pub struct ElasticsearchBackend {
    /// The Elasticsearch client.
    client: Elasticsearch,
    /// Configuration.
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchBackend {
    /// Builds the client. No connection is made until the first call.
    pub fn new(config: ElasticsearchConfig) -> StorageResult<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    fn build_client(config: &ElasticsearchConfig) -> StorageResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_NODE.to_string());

        let node: elasticsearch::http::Url = url.parse().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("invalid node URL {}: {}", url, e),
            })
        })?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(node))
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(auth) = &config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("cannot build transport: {}", e),
            })
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the client.
    pub(crate) fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Returns the concrete index name.
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// Returns the alias targeted by document operations and searches.
    pub fn alias(&self) -> &str {
        &self.config.alias
    }

    /// Returns the per-call timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    /// Runs one engine call under the request timeout.
    ///
    /// When the timeout expires the call future is dropped, which cancels the
    /// in-flight HTTP request.
    pub(crate) async fn bounded<T, F>(&self, operation: &'static str, call: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        match tokio::time::timeout(self.request_timeout(), call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.config.request_timeout_ms,
                    "Elasticsearch call timed out"
                );
                Err(StorageError::Timeout {
                    operation,
                    timeout_ms: self.config.request_timeout_ms,
                })
            }
        }
    }

    /// Makes recent writes visible to search. Tests call this after seeding.
    pub async fn refresh_index(&self) -> StorageResult<()> {
        let index = self.index();
        self.bounded("refresh", async {
            self.client
                .indices()
                .refresh(elasticsearch::indices::IndicesRefreshParts::Index(&[index]))
                .send()
                .await
                .map_err(|e| request_error("refresh", e))?;
            Ok(())
        })
        .await
    }
}

/// Wraps a transport failure with the operation name.
pub(crate) fn request_error(operation: &'static str, err: elasticsearch::Error) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: BACKEND_NAME.to_string(),
        message: format!("{}: request: {}", operation, err),
        source: Some(Box::new(err)),
    })
}

/// Wraps an unexpected engine response with the operation name.
pub(crate) fn response_error(operation: &'static str, status: u16, body: &str) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: BACKEND_NAME.to_string(),
        message: format!("{}: response (status {}): {}", operation, status, body),
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ElasticsearchConfig::default();
        assert_eq!(config.index, "user");
        assert_eq!(config.alias, "user_alias");
        assert_eq!(config.request_timeout_ms, 10000);
        assert_eq!(config.max_result_window, 10000);
        assert_eq!(config.nodes, vec!["http://localhost:9200"]);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ElasticsearchConfig =
            serde_json::from_str(r#"{"nodes": ["http://es:9200"], "alias": "people"}"#).unwrap();
        assert_eq!(config.nodes, vec!["http://es:9200"]);
        assert_eq!(config.alias, "people");
        assert_eq!(config.index, "user");
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_invalid_node_url() {
        let config = ElasticsearchConfig {
            nodes: vec!["not a url".to_string()],
            ..Default::default()
        };
        let err = ElasticsearchBackend::new(config).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::ConnectionFailed { .. })
        ));
    }

    #[test]
    fn test_response_error_message() {
        let err = response_error("update", 500, "boom");
        assert_eq!(
            err.to_string(),
            "elasticsearch: update: response (status 500): boom"
        );
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let config = ElasticsearchConfig {
            request_timeout_ms: 10,
            ..Default::default()
        };
        let backend = ElasticsearchBackend::new(config).unwrap();

        let result: StorageResult<()> = backend
            .bounded("find one", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(
            result,
            Err(StorageError::Timeout {
                operation: "find one",
                timeout_ms: 10
            })
        ));
    }
}
