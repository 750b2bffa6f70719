//! REST API test harness.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;
use userinfo_persistence::backends::memory::MemoryBackend;
use userinfo_persistence::core::UserInfoStorage;
use userinfo_persistence::types::UserInfo;

use userinfo_rest::{ServerConfig, create_app_with_shared_storage};

/// Test harness for REST API testing.
///
/// Holds a test server and a handle to the memory backend behind it, so
/// tests can seed records directly and inspect what the API stored.
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The storage backend.
    pub backend: Arc<MemoryBackend>,
}

impl RestTestHarness {
    /// Creates a harness with [`ServerConfig::for_testing`].
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with the given configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let app = create_app_with_shared_storage(Arc::clone(&backend), config);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, backend }
    }

    /// Stores a record behind the API's back.
    pub async fn seed(&self, record: UserInfo) {
        self.backend
            .insert(&record)
            .await
            .expect("Failed to seed record");
    }

    /// Creates a record through the API and returns its identifier.
    pub async fn create_user(&self, body: Value) -> String {
        let response = self.server.post("/users").json(&body).await;
        response.assert_status(axum::http::StatusCode::CREATED);

        response.json::<Value>()["id"]
            .as_str()
            .expect("create response has no id")
            .to_string()
    }
}
