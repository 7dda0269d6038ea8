//! Integration ports for the authorization code grant server.
//!
//! Implement these traits in your own crate to plug in custom registries without forking.

pub mod storage;

pub use storage::*;
