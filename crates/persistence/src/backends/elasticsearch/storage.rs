//! UserInfoStorage implementation for Elasticsearch.
//!
//! Every call targets the alias rather than the concrete index, and runs
//! under [`ElasticsearchBackend::bounded`].

use async_trait::async_trait;
use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::{CreateParts, DeleteParts, GetParts, UpdateParts};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::UserInfoStorage;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::UserInfo;

use super::backend::{
    BACKEND_NAME, ElasticsearchBackend, request_error, response_error,
};
use super::schema;

/// Body of a get-by-id response. Only `_source` is of interest.
#[derive(Debug, Deserialize)]
struct GetDocument {
    #[serde(rename = "_source")]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ClusterHealth {
    status: String,
}

fn to_payload(operation: &'static str, record: &UserInfo) -> StorageResult<Value> {
    serde_json::to_value(record).map_err(|source| StorageError::Serialization { operation, source })
}

#[async_trait]
impl UserInfoStorage for ElasticsearchBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn target(&self) -> Option<&str> {
        Some(self.alias())
    }

    async fn insert(&self, record: &UserInfo) -> StorageResult<()> {
        let body = to_payload("insert", record)?;

        self.bounded("insert", async {
            let response = self
                .client()
                .create(CreateParts::IndexId(self.alias(), &record.id))
                .body(body)
                .send()
                .await
                .map_err(|e| request_error("insert", e))?;

            let status = response.status_code();
            if !status.is_success() {
                if status.as_u16() == 409 {
                    return Err(StorageError::Conflict {
                        id: record.id.clone(),
                    });
                }
                let body = response.text().await.unwrap_or_default();
                return Err(response_error("insert", status.as_u16(), &body));
            }

            tracing::debug!(id = %record.id, "Inserted user info");
            Ok(())
        })
        .await
    }

    async fn update(&self, record: &UserInfo) -> StorageResult<()> {
        let doc = to_payload("update", record)?;

        self.bounded("update", async {
            let response = self
                .client()
                .update(UpdateParts::IndexId(self.alias(), &record.id))
                .body(json!({ "doc": doc }))
                .send()
                .await
                .map_err(|e| request_error("update", e))?;

            let status = response.status_code();
            if !status.is_success() {
                if status.as_u16() == 404 {
                    return Err(StorageError::NotFound {
                        id: record.id.clone(),
                    });
                }
                let body = response.text().await.unwrap_or_default();
                return Err(response_error("update", status.as_u16(), &body));
            }

            tracing::debug!(id = %record.id, "Updated user info");
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.bounded("delete", async {
            let response = self
                .client()
                .delete(DeleteParts::IndexId(self.alias(), id))
                .send()
                .await
                .map_err(|e| request_error("delete", e))?;

            let status = response.status_code();
            if !status.is_success() {
                if status.as_u16() == 404 {
                    return Err(StorageError::NotFound { id: id.to_string() });
                }
                let body = response.text().await.unwrap_or_default();
                return Err(response_error("delete", status.as_u16(), &body));
            }

            tracing::debug!(id, "Deleted user info");
            Ok(())
        })
        .await
    }

    async fn find_one(&self, id: &str) -> StorageResult<UserInfo> {
        self.bounded("find one", async {
            let response = self
                .client()
                .get(GetParts::IndexId(self.alias(), id))
                .send()
                .await
                .map_err(|e| request_error("find one", e))?;

            let status = response.status_code();
            if !status.is_success() {
                if status.as_u16() == 404 {
                    return Err(StorageError::NotFound { id: id.to_string() });
                }
                let body = response.text().await.unwrap_or_default();
                return Err(response_error("find one", status.as_u16(), &body));
            }

            let document: GetDocument = response
                .json()
                .await
                .map_err(|e| StorageError::decode("find one", e))?;

            let source = document
                .source
                .ok_or_else(|| StorageError::decode("find one", "response has no _source"))?;

            serde_json::from_value(source).map_err(|e| StorageError::decode("find one", e))
        })
        .await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.bounded("health check", async {
            let response = self
                .client()
                .cluster()
                .health(ClusterHealthParts::None)
                .send()
                .await
                .map_err(|e| {
                    StorageError::Backend(BackendError::Unavailable {
                        backend_name: BACKEND_NAME.to_string(),
                        message: format!("Health check failed: {}", e),
                    })
                })?;

            let status = response.status_code();
            if !status.is_success() {
                return Err(StorageError::Backend(BackendError::Unavailable {
                    backend_name: BACKEND_NAME.to_string(),
                    message: format!("Cluster health returned status {}", status),
                }));
            }

            let health: ClusterHealth = response
                .json()
                .await
                .map_err(|e| StorageError::decode("health check", e))?;

            if health.status == "red" {
                return Err(StorageError::Backend(BackendError::Unavailable {
                    backend_name: BACKEND_NAME.to_string(),
                    message: "Cluster status is red".to_string(),
                }));
            }

            Ok(())
        })
        .await
    }

    async fn initialize(&self) -> StorageResult<()> {
        self.bounded("initialize", schema::ensure_index(self)).await
    }
}
