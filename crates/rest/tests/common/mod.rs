//! Common test utilities for REST API testing.
//!
//! - [`harness`] - REST API test harness over the memory backend
//! - [`failing`] - A backend that fails every call in a chosen way

#![allow(dead_code)]

pub mod failing;
pub mod harness;
