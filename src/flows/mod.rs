//! Grant Flows
//!
//! Non-interactive token acquisition strategies.
//!
//! - **Script**: password grant for personal-use scripts
//! - **Application-only**: userless access for confidential clients and installed apps
//!
//! The refresh-token exchange lives with the token manager, which owns the
//! refresh token.

pub mod application_only;
pub mod script;

// Script
pub use script::{create_mock_script_grant, MockScriptGrant, ScriptGrant, ScriptGrantImpl};

// Application-only
pub use application_only::{
    create_mock_application_only_grant, ApplicationOnlyGrant, ApplicationOnlyGrantImpl,
    MockApplicationOnlyGrant,
};

use crate::core::{HttpRequest, HttpTransport};
use crate::error::{token_endpoint_error, RedditAuthError};
use crate::types::TokenData;

/// Send a request to the token endpoint and read the issued token.
pub(crate) async fn exchange_token<T>(
    transport: &T,
    request: &HttpRequest,
) -> Result<TokenData, RedditAuthError>
where
    T: HttpTransport + ?Sized,
{
    let response = transport.send(request).await?;

    if !response.is_success() {
        return Err(token_endpoint_error(response.status, &response.body));
    }

    response.deserialize()
}
