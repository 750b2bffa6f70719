//! Storage backend implementations.
//!
//! Each backend is gated behind a feature flag.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | `memory` | In-process map, for tests and local development |
//! | Elasticsearch | `elasticsearch` | Production search engine adapter |
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "memory")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use userinfo_persistence::backends::memory::MemoryBackend;
//! use userinfo_persistence::core::UserInfoStorage;
//! use userinfo_persistence::types::UserInfo;
//!
//! let backend = MemoryBackend::new();
//! backend
//!     .insert(&UserInfo::new("1", "Alice", "Engineer", vec![], ""))
//!     .await?;
//! assert_eq!(backend.find_one("1").await?.name, "Alice");
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
