//! Core user info storage trait.
//!
//! This module defines the [`UserInfoStorage`] trait, which provides the
//! document-level operations against the backing store. Implementations hold
//! only an immutable client handle and configuration, so a single instance is
//! shared by every request.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::UserInfo;

/// Core storage trait for user info documents.
///
/// Every operation is bounded by the backend's request timeout; an expired
/// call fails with [`StorageError::Timeout`](crate::error::StorageError::Timeout)
/// and the in-flight request is dropped. No retries are performed.
///
/// # Example
///
/// ```ignore
/// use userinfo_persistence::core::UserInfoStorage;
/// use userinfo_persistence::types::UserInfo;
///
/// async fn example<S: UserInfoStorage>(storage: &S) -> StorageResult<()> {
///     let record = UserInfo::new("42", "Alice", "Engineer", vec![], "n/a");
///     storage.insert(&record).await?;
///
///     let read = storage.find_one("42").await?;
///     assert_eq!(read.name, "Alice");
///
///     storage.delete("42").await?;
///     assert!(storage.find_one("42").await.unwrap_err().is_not_found());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait UserInfoStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Returns the index or alias that documents are read from and written
    /// to, for backends that address one.
    fn target(&self) -> Option<&str> {
        None
    }

    /// Writes a new document keyed by `record.id`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Conflict` - If a document with that id already exists
    /// * `StorageError::Serialization` - If the record cannot be encoded
    async fn insert(&self, record: &UserInfo) -> StorageResult<()>;

    /// Merges `record` into the existing document with the same id.
    ///
    /// Fields absent from the serialized record (such as an unset
    /// `created_at`) keep their stored values.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - If no document exists under that id
    async fn update(&self, record: &UserInfo) -> StorageResult<()>;

    /// Removes the document.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - If no document exists under that id
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Reads a single document by id.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - If no document exists under that id
    /// * `StorageError::Decode` - If the stored document does not match the record shape
    async fn find_one(&self, id: &str) -> StorageResult<UserInfo>;

    /// Checks that the backend can serve requests.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Prepares the backend (index, alias, mappings). Must be idempotent.
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }
}
