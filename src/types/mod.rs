//! Types
//!
//! Core type definitions: credentials, token data, configuration.

pub mod config;
pub mod credentials;
pub mod token;

pub use config::*;
pub use credentials::*;
pub use token::*;
