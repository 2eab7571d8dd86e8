//! Credential Types
//!
//! Client credentials and the authentication method they imply.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, RedditAuthError};

/// The kind of app registered with reddit, which decides how tokens are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Personal-use script authenticating with its owner's username and password.
    Script,
    /// Installed (mobile/desktop) app authorized by a user.
    Installed,
    /// Web app authorized by a user.
    Web,
    /// Application-only access for a confidential client (script or web app).
    Userless,
    /// Application-only access for an installed app, keyed by a device id.
    UserlessInstalled,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Installed => "installed",
            Self::Web => "web",
            Self::Userless => "userless",
            Self::UserlessInstalled => "userless_installed",
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script)
    }

    /// Application-only variants. These never receive a refresh token.
    pub fn is_userless(&self) -> bool {
        matches!(self, Self::Userless | Self::UserlessInstalled)
    }

    /// Methods that can obtain a token without a user in the loop.
    pub fn is_non_interactive(&self) -> bool {
        self.is_script() || self.is_userless()
    }

    /// Methods that need a user to authorize the app, and a refresh token afterwards.
    pub fn is_interactive(&self) -> bool {
        !self.is_non_interactive()
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device id reddit accepts when the caller does not want to be tracked.
pub const DO_NOT_TRACK_DEVICE_ID: &str = "DO_NOT_TRACK_THIS_DEVICE";

/// Immutable client credentials.
///
/// Build these with the per-method constructors, which check that the fields the
/// method needs are present.
#[derive(Clone)]
pub struct Credentials {
    auth_method: AuthMethod,
    client_id: String,
    client_secret: Option<SecretString>,
    redirect_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    device_id: Option<String>,
}

impl Credentials {
    /// Script app credentials.
    pub fn script(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, RedditAuthError> {
        let username = required("username", username.into())?;
        let password = required("password", password.into())?;
        Ok(Self {
            auth_method: AuthMethod::Script,
            client_id: required("client_id", client_id.into())?,
            client_secret: Some(SecretString::new(required(
                "client_secret",
                client_secret.into(),
            )?)),
            redirect_url: None,
            username: Some(username),
            password: Some(SecretString::new(password)),
            device_id: None,
        })
    }

    /// Installed app credentials. Installed apps have no client secret.
    pub fn installed_app(
        client_id: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Result<Self, RedditAuthError> {
        Ok(Self {
            auth_method: AuthMethod::Installed,
            client_id: required("client_id", client_id.into())?,
            client_secret: None,
            redirect_url: Some(required("redirect_url", redirect_url.into())?),
            username: None,
            password: None,
            device_id: None,
        })
    }

    /// Web app credentials.
    pub fn web_app(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Result<Self, RedditAuthError> {
        Ok(Self {
            auth_method: AuthMethod::Web,
            client_id: required("client_id", client_id.into())?,
            client_secret: Some(SecretString::new(required(
                "client_secret",
                client_secret.into(),
            )?)),
            redirect_url: Some(required("redirect_url", redirect_url.into())?),
            username: None,
            password: None,
            device_id: None,
        })
    }

    /// Application-only credentials for a script or web app.
    pub fn userless(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, RedditAuthError> {
        Ok(Self {
            auth_method: AuthMethod::Userless,
            client_id: required("client_id", client_id.into())?,
            client_secret: Some(SecretString::new(required(
                "client_secret",
                client_secret.into(),
            )?)),
            redirect_url: None,
            username: None,
            password: None,
            device_id: None,
        })
    }

    /// Application-only credentials for an installed app.
    ///
    /// `device_id` must be 20-30 characters per reddit's rules; pass
    /// [`DO_NOT_TRACK_DEVICE_ID`] or use [`Credentials::userless_app_random`].
    pub fn userless_app(
        client_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Result<Self, RedditAuthError> {
        let device_id = required("device_id", device_id.into())?;
        let len = device_id.chars().count();
        if !(20..=30).contains(&len) {
            return Err(ConfigurationError::InvalidConfig {
                message: format!("device_id must be 20-30 characters, got {}", len),
            }
            .into());
        }

        Ok(Self {
            auth_method: AuthMethod::UserlessInstalled,
            client_id: required("client_id", client_id.into())?,
            client_secret: None,
            redirect_url: None,
            username: None,
            password: None,
            device_id: Some(device_id),
        })
    }

    /// Application-only credentials for an installed app with a freshly generated device id.
    pub fn userless_app_random(client_id: impl Into<String>) -> Result<Self, RedditAuthError> {
        Self::userless_app(client_id, generate_device_id())
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret, empty for apps that have none.
    pub fn client_secret(&self) -> &str {
        self.client_secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .unwrap_or("")
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|p| p.expose_secret().as_str())
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_method", &self.auth_method)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("device_id", &self.device_id)
            .finish()
    }
}

fn required(field: &str, value: String) -> Result<String, RedditAuthError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::MissingField {
            field: field.to_string(),
        }
        .into());
    }
    Ok(value)
}

fn generate_device_id() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(30)
        .map(char::from)
        .collect()
}
