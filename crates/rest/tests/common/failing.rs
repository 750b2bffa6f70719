//! A storage backend that fails every call.

use async_trait::async_trait;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};
use userinfo_persistence::error::{BackendError, StorageError, StorageResult};
use userinfo_persistence::types::{KeyValueQuery, RawQuery, UserInfo};

/// How the backend fails.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Conflict,
    Timeout,
    Unavailable,
}

/// Backend returning the configured failure from every call.
#[derive(Debug, Clone, Copy)]
pub struct FailingBackend(pub Failure);

impl FailingBackend {
    fn error(&self, operation: &'static str, id: &str) -> StorageError {
        match self.0 {
            Failure::Conflict => StorageError::Conflict { id: id.to_string() },
            Failure::Timeout => StorageError::Timeout {
                operation,
                timeout_ms: 10000,
            },
            Failure::Unavailable => StorageError::Backend(BackendError::Unavailable {
                backend_name: "failing".to_string(),
                message: "cluster status is red".to_string(),
            }),
        }
    }
}

#[async_trait]
impl UserInfoStorage for FailingBackend {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn insert(&self, record: &UserInfo) -> StorageResult<()> {
        Err(self.error("insert", &record.id))
    }

    async fn update(&self, record: &UserInfo) -> StorageResult<()> {
        Err(self.error("update", &record.id))
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        Err(self.error("delete", id))
    }

    async fn find_one(&self, id: &str) -> StorageResult<UserInfo> {
        Err(self.error("find one", id))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Err(self.error("health check", ""))
    }
}

#[async_trait]
impl UserInfoSearch for FailingBackend {
    async fn find_by_key_and_value(
        &self,
        _query: &KeyValueQuery,
    ) -> StorageResult<Vec<UserInfo>> {
        Err(self.error("find by key and value", ""))
    }

    async fn find_by_query(&self, _query: &RawQuery) -> StorageResult<Vec<UserInfo>> {
        Err(self.error("find by query", ""))
    }
}
