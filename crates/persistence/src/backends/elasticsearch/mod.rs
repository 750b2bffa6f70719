//! Elasticsearch backend implementation.
//!
//! The production adapter. Documents live in one concrete index (default
//! `user`) that is reached only through an alias (default `user_alias`), so the
//! index can be rebuilt and swapped behind the alias without touching the
//! service.
//!
//! # Example
//!
//! ```ignore
//! use userinfo_persistence::backends::elasticsearch::{ElasticsearchBackend, ElasticsearchConfig};
//! use userinfo_persistence::core::UserInfoStorage;
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let backend = ElasticsearchBackend::new(config)?;
//! backend.initialize().await?;
//! ```

mod backend;
mod schema;
mod search_impl;
mod storage;

pub use backend::{ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig};
pub use schema::{create_index_mapping, delete_index};
