//! Library exports.
//!
//! The workspace crates carry the implementation; this facade gives additional
//! binaries and the integration tests a single import root.

pub use authcode_actix::{actors, handlers};
pub use authcode_config::Config;
pub use authcode_core as models;
pub use authcode_observability::Metrics;
pub use authcode_openapi::ApiDoc;
pub use authcode_ports::{DynStorage, RegistryStats, Storage};
pub use authcode_server::{run, AppState};
pub use authcode_storage_memory::InMemoryStorage;
