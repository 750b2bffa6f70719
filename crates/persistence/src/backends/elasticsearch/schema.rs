//! Elasticsearch index schema and alias bootstrap.

use elasticsearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutAliasParts,
};
use serde_json::json;

use crate::error::StorageResult;

use super::backend::{ElasticsearchBackend, ElasticsearchConfig, request_error, response_error};

/// Creates the index body: settings, user info mapping and the alias.
///
/// `name`, `job` and `childNames` are analyzed text with a `keyword`
/// sub-field so both `match` and exact `term` queries have something to hit.
pub fn create_index_mapping(config: &ElasticsearchConfig) -> serde_json::Value {
    let mut aliases = serde_json::Map::new();
    aliases.insert(config.alias.clone(), json!({}));

    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas,
            "index.max_result_window": config.max_result_window,
            "refresh_interval": config.refresh_interval
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "name": {
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
                },
                "job": {
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
                },
                "childNames": {
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
                },
                "comment": { "type": "text" },
                "created_at": { "type": "date" }
            }
        },
        "aliases": aliases
    })
}

/// Ensures the index exists and the alias points at it.
pub async fn ensure_index(backend: &ElasticsearchBackend) -> StorageResult<()> {
    let index = backend.index();

    let exists_response = backend
        .client()
        .indices()
        .exists(IndicesExistsParts::Index(&[index]))
        .send()
        .await
        .map_err(|e| request_error("initialize", e))?;

    if exists_response.status_code().is_success() {
        return ensure_alias(backend).await;
    }

    let mapping = create_index_mapping(backend.config());

    let response = backend
        .client()
        .indices()
        .create(IndicesCreateParts::Index(index))
        .body(mapping)
        .send()
        .await
        .map_err(|e| request_error("initialize", e))?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        // Another instance created it between the check and the create
        if body.contains("resource_already_exists_exception") {
            return ensure_alias(backend).await;
        }
        return Err(response_error("initialize", status.as_u16(), &body));
    }

    tracing::info!(index, alias = backend.alias(), "Created Elasticsearch index");
    Ok(())
}

/// Points the alias at the index. Idempotent.
async fn ensure_alias(backend: &ElasticsearchBackend) -> StorageResult<()> {
    let index = backend.index();
    let alias = backend.alias();

    let response = backend
        .client()
        .indices()
        .put_alias(IndicesPutAliasParts::IndexName(&[index], alias))
        .send()
        .await
        .map_err(|e| request_error("initialize", e))?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(response_error("initialize", status.as_u16(), &body));
    }

    tracing::debug!(index, alias, "Elasticsearch alias in place");
    Ok(())
}

/// Deletes the index. A missing index is not an error.
pub async fn delete_index(backend: &ElasticsearchBackend) -> StorageResult<()> {
    let index = backend.index();

    let response = backend
        .client()
        .indices()
        .delete(IndicesDeleteParts::Index(&[index]))
        .send()
        .await
        .map_err(|e| request_error("delete index", e))?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if !body.contains("index_not_found_exception") {
            return Err(response_error("delete index", status.as_u16(), &body));
        }
    }

    tracing::debug!(index, "Deleted Elasticsearch index");
    Ok(())
}
