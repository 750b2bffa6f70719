//! Core types for the persistence layer.
//!
//! - [`UserInfo`] - the stored document
//! - [`QueryType`], [`KeyValueQuery`] - single-clause structured search
//! - [`RawQuery`] - a validated caller-supplied query document
//!
//! # Example
//!
//! ```
//! use userinfo_persistence::types::{KeyValueQuery, QueryType};
//!
//! let query = KeyValueQuery::new(QueryType::Match, "name", "Alice").unwrap();
//! assert_eq!(
//!     query.to_query_body(),
//!     serde_json::json!({ "query": { "match": { "name": "Alice" } } })
//! );
//! ```

mod query;
mod user_info;

pub use query::{
    ALLOWED_RAW_QUERY_KEYS, KeyValueQuery, QueryType, RawQuery, SCRIPT_KEYS, SEARCHABLE_FIELDS,
};
pub use user_info::UserInfo;
