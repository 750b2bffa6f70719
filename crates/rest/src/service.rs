//! The user info service.
//!
//! Assembles records from requests and maps records to responses. It holds no
//! state besides the storage handle and adds nothing to storage errors.

use std::sync::Arc;

use chrono::Utc;
use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};
use userinfo_persistence::error::StorageResult;
use userinfo_persistence::types::{KeyValueQuery, RawQuery, UserInfo};
use uuid::Uuid;

use crate::models::{
    CreateRequest, CreateResponse, DeleteRequest, FindByRequest, FindRequest, FindResponse,
    UpdateRequest,
};

/// Service over a storage backend.
pub struct UserInfoService<S> {
    storage: Arc<S>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for UserInfoService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S> UserInfoService<S>
where
    S: UserInfoStorage + UserInfoSearch,
{
    /// Creates a service over the given storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stores a new record under a fresh UUID and the current time.
    pub async fn create(&self, request: CreateRequest) -> StorageResult<CreateResponse> {
        let id = Uuid::new_v4().to_string();
        let record = UserInfo::new(
            id.clone(),
            request.name,
            request.job,
            request.child_names,
            request.comment,
        )
        .with_created_at(Utc::now());

        self.storage.insert(&record).await?;
        Ok(CreateResponse { id })
    }

    /// Overwrites the record's fields. The creation timestamp is left alone.
    pub async fn update(&self, id: &str, request: UpdateRequest) -> StorageResult<()> {
        let record = UserInfo::new(
            id,
            request.name,
            request.job,
            request.child_names,
            request.comment,
        );
        self.storage.update(&record).await
    }

    /// Removes the record.
    pub async fn delete(&self, request: DeleteRequest) -> StorageResult<()> {
        self.storage.delete(&request.id).await
    }

    /// Reads one record.
    pub async fn find(&self, request: FindRequest) -> StorageResult<FindResponse> {
        self.storage.find_one(&request.id).await.map(Into::into)
    }

    /// Runs a single-clause search.
    pub async fn find_by_key_and_value(
        &self,
        request: FindByRequest,
    ) -> StorageResult<Vec<FindResponse>> {
        let query = KeyValueQuery::parse(&request.query_type, &request.key, &request.value)?;
        let records = self.storage.find_by_key_and_value(&query).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Runs a caller-supplied search document.
    pub async fn find_by_query(&self, json_query: &str) -> StorageResult<Vec<FindResponse>> {
        let query = RawQuery::parse(json_query)?;
        let records = self.storage.find_by_query(&query).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}
