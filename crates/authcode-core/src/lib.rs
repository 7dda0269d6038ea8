//! Framework-agnostic domain types and helpers for the authorization code grant.
//!
//! This crate is intended to be reused by other applications without pulling in the
//! HTTP layer: it knows nothing about Actix, storage backends or configuration.

pub mod identifiers;
pub mod models;

pub use identifiers::*;
pub use models::*;
