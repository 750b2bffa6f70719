//! UserInfoSearch implementation for Elasticsearch.

use async_trait::async_trait;
use elasticsearch::SearchParts;
use serde::Deserialize;
use serde_json::Value;

use crate::core::UserInfoSearch;
use crate::error::{StorageError, StorageResult};
use crate::types::{KeyValueQuery, RawQuery, UserInfo};

use super::backend::{ElasticsearchBackend, request_error, response_error};

/// Search response envelope. Only `hits.hits` is read.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

impl SearchResponse {
    /// Decodes each hit independently, skipping the ones that don't fit the
    /// record shape.
    pub(crate) fn into_records(self, operation: &'static str) -> Vec<UserInfo> {
        let mut records = Vec::with_capacity(self.hits.hits.len());

        for hit in self.hits.hits {
            let id = hit.id.unwrap_or_default();
            let Some(source) = hit.source else {
                tracing::warn!(operation, id = %id, "Skipping search hit without _source");
                continue;
            };

            match serde_json::from_value::<UserInfo>(source) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        operation,
                        id = %id,
                        error = %e,
                        "Skipping undecodable search hit"
                    );
                }
            }
        }

        records
    }
}

impl ElasticsearchBackend {
    /// Sends a search body to the alias and maps the hits.
    async fn execute_search(
        &self,
        operation: &'static str,
        body: Value,
    ) -> StorageResult<Vec<UserInfo>> {
        let alias = self.alias();

        self.bounded(operation, async {
            let response = self
                .client()
                .search(SearchParts::Index(&[alias]))
                .body(body)
                .send()
                .await
                .map_err(|e| request_error(operation, e))?;

            let status = response.status_code();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                if status.as_u16() == 400 {
                    // The engine refused the query itself
                    return Err(StorageError::InvalidQuery { message: text });
                }
                return Err(response_error(operation, status.as_u16(), &text));
            }

            let envelope: SearchResponse = response
                .json()
                .await
                .map_err(|e| StorageError::decode(operation, e))?;

            let records = envelope.into_records(operation);
            tracing::debug!(operation, count = records.len(), "Search completed");
            Ok(records)
        })
        .await
    }
}

#[async_trait]
impl UserInfoSearch for ElasticsearchBackend {
    async fn find_by_key_and_value(&self, query: &KeyValueQuery) -> StorageResult<Vec<UserInfo>> {
        self.execute_search("find by key and value", query.to_query_body())
            .await
    }

    async fn find_by_query(&self, query: &RawQuery) -> StorageResult<Vec<UserInfo>> {
        let body = query.to_body(u64::from(self.config().max_result_window));
        self.execute_search("find by query", body).await
    }
}
