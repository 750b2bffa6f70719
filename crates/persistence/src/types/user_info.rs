//! The stored user info record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user info document as it is stored in the search engine.
///
/// Field names match the engine's document shape exactly (`childNames` is
/// camel case, `created_at` is snake case). `created_at` is written once at
/// creation and omitted from update payloads, so a partial merge-update
/// never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Document identifier, immutable after creation.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Job title.
    pub job: String,

    /// Names of the user's children, in order.
    #[serde(rename = "childNames")]
    pub child_names: Vec<String>,

    /// Free-form comment.
    pub comment: String,

    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserInfo {
    /// Creates a record without a creation timestamp.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        job: impl Into<String>,
        child_names: Vec<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            job: job.into(),
            child_names,
            comment: comment.into(),
            created_at: None,
        }
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
