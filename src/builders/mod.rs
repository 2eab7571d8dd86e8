//! Builders
//!
//! Fluent builder patterns for client configuration.

pub mod config;

pub use config::{reddit_auth_config, RedditAuthConfigBuilder};
