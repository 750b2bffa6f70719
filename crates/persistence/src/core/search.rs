//! Search provider trait.

use async_trait::async_trait;

use crate::core::UserInfoStorage;
use crate::error::StorageResult;
use crate::types::{KeyValueQuery, RawQuery, UserInfo};

/// Search over the fixed user info collection.
///
/// Each hit's source is decoded independently. A hit that does not decode
/// into a [`UserInfo`] is skipped with a warning; it never aborts the query.
#[async_trait]
pub trait UserInfoSearch: UserInfoStorage {
    /// Executes a single-clause structured query.
    async fn find_by_key_and_value(&self, query: &KeyValueQuery) -> StorageResult<Vec<UserInfo>>;

    /// Executes a validated caller-supplied query document.
    async fn find_by_query(&self, query: &RawQuery) -> StorageResult<Vec<UserInfo>>;
}
