//! Token Types
//!
//! Token data as issued by reddit's token endpoint.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize};

/// One issued token. Immutable once constructed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    /// Access token.
    access_token: String,
    /// Token type (reddit sends "bearer").
    #[serde(default = "default_token_type")]
    token_type: String,
    /// Lifetime in seconds from issuance.
    expires_in: u64,
    /// Granted scopes. Sent as a space separated string.
    #[serde(
        default,
        deserialize_with = "deserialize_scope",
        serialize_with = "serialize_scope"
    )]
    scope: Vec<String>,
    /// Only issued to installed and web apps that asked for permanent access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// Largest lifetime `chrono::Duration` can hold in whole seconds.
const MAX_SHELF_LIFE_SECS: u64 = (i64::MAX / 1000) as u64;

fn default_token_type() -> String {
    "bearer".to_string()
}

fn deserialize_scope<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.split_whitespace().map(String::from).collect())
        .unwrap_or_default())
}

fn serialize_scope<S>(scope: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&scope.join(" "))
}

impl TokenData {
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: u64,
        scope: Vec<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in,
            scope,
            refresh_token,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Lifetime in seconds, counted from when the token was received.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// Lifetime as a duration.
    pub fn shelf_life(&self) -> Duration {
        Duration::seconds(self.expires_in.min(MAX_SHELF_LIFE_SECS) as i64)
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl std::fmt::Debug for TokenData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenData")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
