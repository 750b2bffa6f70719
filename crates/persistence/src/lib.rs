//! User info persistence layer.
//!
//! This crate stores and searches user info documents. The storage contract is
//! split in two traits, [`core::UserInfoStorage`] for document operations and
//! [`core::UserInfoSearch`] for queries, so that callers receive their backend
//! by injection and never reach for a global client.
//!
//! # Backend Features
//!
//! - `elasticsearch` (default) - the production search engine adapter
//! - `memory` (default) - an in-process backend for tests and local development
//!
//! # Architecture
//!
//! - [`types`] - the stored record and the query types
//! - [`error`] - error types for all operations
//! - [`core`] - storage and search traits
//! - [`backends`] - backend implementations
//!
//! # Quick Start
//!
//! ```
//! # #[cfg(feature = "memory")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use userinfo_persistence::backends::memory::MemoryBackend;
//! use userinfo_persistence::core::{UserInfoSearch, UserInfoStorage};
//! use userinfo_persistence::types::{KeyValueQuery, QueryType, UserInfo};
//!
//! let backend = MemoryBackend::new();
//! backend
//!     .insert(&UserInfo::new("1", "Alice", "Engineer", vec!["Bob".into()], "n/a"))
//!     .await?;
//!
//! let query = KeyValueQuery::new(QueryType::Match, "name", "alice")?;
//! let found = backend.find_by_key_and_value(&query).await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
