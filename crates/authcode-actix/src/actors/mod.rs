pub mod auth_actor;
pub mod client_actor;
pub mod token_actor;

pub use auth_actor::*;
pub use client_actor::*;
pub use token_actor::*;

/// Attempts made to draw an identifier that is not already registered.
pub(crate) const MAX_IDENTIFIER_ATTEMPTS: usize = 3;
