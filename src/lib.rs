//! Reddit OAuth
//!
//! Access-token lifecycle management for the reddit API, plus a small
//! parameterized HTTP request builder.
//!
//! # Features
//!
//! - Script apps (password grant)
//! - Application-only access for confidential clients and installed apps
//! - Refresh-token renewal for installed and web apps
//! - Immutable request descriptors with path templates, form bodies and basic auth
//! - Handler-based dispatch with explicit unhandled outcomes
//!
//! # Example
//!
//! ```rust,ignore
//! use reddit_oauth::{reddit_auth_config, Credentials, RedditAuthClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = reddit_auth_config()
//!         .user_agent("linux:my-bot:v0.1.0 (by /u/me)")
//!         .build()?;
//!     let credentials = Credentials::script("me", "hunter2", "client-id", "client-secret")?;
//!
//!     let mut client = RedditAuthClient::new(config, credentials)?;
//!     let builder = client
//!         .request()
//!         .path_with_params("/r/{subreddit}/about", ["rust"]);
//!     let response = client.execute(builder).await?;
//!
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: credentials, token data and configuration
//! - `error`: error hierarchy
//! - `core`: request builder, HTTP transport, dispatch and clock
//! - `flows`: script and application-only grants
//! - `token`: token state and the renewing manager
//! - `builders`: fluent configuration builder
//! - `client`: high-level client combining the above

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{reddit_auth_client, RedditAuthClient};

// Re-export builders
pub use builders::{reddit_auth_config, RedditAuthConfigBuilder};

// Re-export errors
pub use error::{
    token_endpoint_error, AuthError, AuthStateError, ConfigurationError, ProtocolError,
    RedditAuthError, RedditAuthResult, TransportError,
};

// Re-export types
pub use types::{
    // Config
    GrantType, RedditAuthConfig, DEFAULT_OAUTH_HOST, DEFAULT_TOKEN_ENDPOINT,
    DEFAULT_USER_AGENT,
    // Credentials
    AuthMethod, Credentials, DO_NOT_TRACK_DEVICE_ID,
    // Token
    TokenData,
};

// Re-export core components
pub use crate::core::{
    // Request
    BasicAuth, HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody,
    // Transport
    HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
    // Dispatch
    dispatch, spawn_dispatch, Outcome, Unhandled,
    // Clock
    Clock, MockClock, SystemClock,
};

// Re-export flows
pub use flows::{
    // Script
    MockScriptGrant, ScriptGrant, ScriptGrantImpl,
    // Application-only
    ApplicationOnlyGrant, ApplicationOnlyGrantImpl, MockApplicationOnlyGrant,
};

// Re-export token management
pub use token::{AuthManager, TokenState};
