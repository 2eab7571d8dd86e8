//! Token State
//!
//! The mutable token aggregate owned by [`AuthManager`](crate::token::AuthManager).

use chrono::{DateTime, Utc};

use crate::types::TokenData;

/// Current token, its absolute expiration, and the sticky refresh token.
#[derive(Clone, Default)]
pub struct TokenState {
    current: Option<TokenData>,
    expiration: Option<DateTime<Utc>>,
    refresh_token: Option<String>,
}

impl TokenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&TokenData> {
        self.current.as_ref()
    }

    /// When the current token stops being valid. `None` iff there is no current token.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// No current token, or `now` is at or past the expiration.
    pub fn needs_renewing_at(&self, now: DateTime<Utc>) -> bool {
        if self.current.is_none() {
            return true;
        }
        match self.expiration {
            Some(expiration) => now >= expiration,
            None => true,
        }
    }

    /// Replace the current token as of `now`.
    ///
    /// Expiration is recomputed (and cleared with the token). A refresh token
    /// carried by `data` replaces the held one; otherwise the held one stays.
    pub(crate) fn replace(&mut self, data: Option<TokenData>, now: DateTime<Utc>) {
        self.expiration = data.as_ref().map(|d| {
            now.checked_add_signed(d.shelf_life())
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        });

        if let Some(refresh_token) = data.as_ref().and_then(TokenData::refresh_token) {
            self.refresh_token = Some(refresh_token.to_string());
        }

        self.current = data;
    }

    pub(crate) fn set_refresh_token(&mut self, refresh_token: Option<String>) {
        self.refresh_token = refresh_token;
    }
}

impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("current", &self.current)
            .field("expiration", &self.expiration)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
