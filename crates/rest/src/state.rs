//! Application state for the user info API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the service and the server configuration.

use std::sync::Arc;

use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};

use crate::config::ServerConfig;
use crate::service::UserInfoService;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`UserInfoStorage`] and [`UserInfoSearch`])
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "memory")]
/// # {
/// use std::sync::Arc;
/// use userinfo_persistence::backends::memory::MemoryBackend;
/// use userinfo_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
/// assert_eq!(state.config().port, 8084);
/// # }
/// ```
pub struct AppState<S> {
    /// The service wrapping the storage backend.
    service: UserInfoService<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S> AppState<S>
where
    S: UserInfoStorage + UserInfoSearch,
{
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            service: UserInfoService::new(storage),
            config: Arc::new(config),
        }
    }

    /// Returns the service.
    pub fn service(&self) -> &UserInfoService<S> {
        &self.service
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        self.service.storage()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use userinfo_persistence::error::StorageResult;
    use userinfo_persistence::types::{KeyValueQuery, RawQuery, UserInfo};

    // Mock storage for testing
    struct MockStorage;

    #[async_trait]
    impl UserInfoStorage for MockStorage {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn insert(&self, _record: &UserInfo) -> StorageResult<()> {
            unimplemented!()
        }

        async fn update(&self, _record: &UserInfo) -> StorageResult<()> {
            unimplemented!()
        }

        async fn delete(&self, _id: &str) -> StorageResult<()> {
            unimplemented!()
        }

        async fn find_one(&self, _id: &str) -> StorageResult<UserInfo> {
            unimplemented!()
        }
    }

    #[async_trait]
    impl UserInfoSearch for MockStorage {
        async fn find_by_key_and_value(
            &self,
            _query: &KeyValueQuery,
        ) -> StorageResult<Vec<UserInfo>> {
            unimplemented!()
        }

        async fn find_by_query(&self, _query: &RawQuery) -> StorageResult<Vec<UserInfo>> {
            unimplemented!()
        }
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Arc::new(MockStorage), ServerConfig::default());
        assert_eq!(state.storage().backend_name(), "mock");
        assert_eq!(state.config().port, 8084);
    }

    #[test]
    fn test_app_state_clone_shares_config() {
        let config = ServerConfig {
            max_result_window: 50,
            ..Default::default()
        };
        let state = AppState::new(Arc::new(MockStorage), config);
        let cloned = state.clone();

        assert_eq!(cloned.config().max_result_window, 50);
        assert!(std::ptr::eq(state.config(), cloned.config()));
    }

    #[tokio::test]
    async fn test_health_check_defaults_to_ok() {
        let state = AppState::new(Arc::new(MockStorage), ServerConfig::default());
        assert!(state.storage().health_check().await.is_ok());
        assert!(state.storage().initialize().await.is_ok());
    }
}
