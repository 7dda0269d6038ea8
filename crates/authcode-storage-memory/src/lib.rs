//! In-memory registries for clients, authorization codes and access tokens.
//!
//! Nothing survives a process restart. Each registry sits behind its own `RwLock`,
//! held only for the single read or read-modify-write an operation needs.

mod memory;

pub use memory::InMemoryStorage;
