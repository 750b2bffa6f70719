//! Core storage traits.
//!
//! - [`UserInfoStorage`] - document CRUD
//! - [`UserInfoSearch`] - structured and raw query search
//!
//! ```text
//! UserInfoStorage
//!     └── UserInfoSearch
//! ```

mod search;
mod storage;

pub use search::UserInfoSearch;
pub use storage::UserInfoStorage;
