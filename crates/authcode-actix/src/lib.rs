//! Actix-web HTTP surface for the authorization code grant server.
//!
//! This crate intentionally contains framework-specific code (Actix handlers and actors).
//! Domain types live in `authcode-core`, while the registries are abstracted behind
//! `authcode-ports`.

pub mod actors;
pub mod handlers;
