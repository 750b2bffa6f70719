//! Request and response bodies of the HTTP API.
//!
//! Field names follow the public wire format (`childNames`, `queryType`,
//! `jsonQuery` are camel case; `created_at` is snake case).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userinfo_persistence::types::UserInfo;

/// Body of `POST /users`.
///
/// Absent fields default to empty values; fields of the wrong type reject the
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub job: String,
    /// Names of the user's children.
    #[serde(rename = "childNames", default)]
    pub child_names: Vec<String>,
    /// Free-form comment.
    #[serde(default)]
    pub comment: String,
}

/// Body of `PUT /users/{id}`. Same shape as [`CreateRequest`].
pub type UpdateRequest = CreateRequest;

/// Identifies the record to delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteRequest {
    /// Record identifier.
    pub id: String,
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FindRequest {
    /// Record identifier.
    pub id: String,
}

/// Query string of `GET /users-by`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FindByRequest {
    /// One of the supported query types, e.g. `match`.
    #[serde(rename = "queryType")]
    pub query_type: String,
    /// Field to search.
    pub key: String,
    /// Value to search for.
    pub value: String,
}

/// Query string of `GET /users-by-query`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FindByQueryRequest {
    /// A JSON search document.
    #[serde(rename = "jsonQuery")]
    pub json_query: String,
}

/// Body returned by `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    /// Identifier of the new record.
    pub id: String,
}

/// A record as returned by the read and search endpoints.
///
/// `created_at` is always present and `null` when the stored document has no
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindResponse {
    /// Record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title.
    pub job: String,
    /// Names of the user's children.
    #[serde(rename = "childNames")]
    pub child_names: Vec<String>,
    /// Free-form comment.
    pub comment: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UserInfo> for FindResponse {
    fn from(record: UserInfo) -> Self {
        Self {
            id: record.id,
            name: record.name,
            job: record.job,
            child_names: record.child_names,
            comment: record.comment,
            created_at: record.created_at,
        }
    }
}
