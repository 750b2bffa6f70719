//! HTTP request handlers.
//!
//! - [`create`] - Create a record
//! - [`read`] - Read a record by ID
//! - [`update`] - Update a record
//! - [`delete`] - Delete a record
//! - [`search`] - Key/value and raw query search
//! - [`health`] - Health, liveness and readiness endpoints

pub mod create;
pub mod delete;
pub mod health;
pub mod read;
pub mod search;
pub mod update;

// Re-export handlers for convenience
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use read::read_handler;
pub use search::{search_by_handler, search_by_query_handler};
pub use update::update_handler;
