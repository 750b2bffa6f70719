//! Route configuration for the user info API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod user_routes;

pub use user_routes::create_routes;
