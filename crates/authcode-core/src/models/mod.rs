pub mod authorization;
pub mod client;
pub mod error;
pub mod responses;
pub mod token;

pub use authorization::*;
pub use client::*;
pub use error::*;
pub use responses::*;
pub use token::*;
