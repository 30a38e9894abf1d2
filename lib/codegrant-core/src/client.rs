use std::sync::Arc;

use crate::auth::ClientAuthentication;
use crate::config::{ClientConfig, EndpointConfig, SharedClientConfig};
use crate::exchange::{TokenTransport, exchange_token};
use crate::request::{AuthorizationRequest, EndSessionRequest, TokenRequest};
use crate::response::AuthorizationResponse;
use crate::secure::SecureString;
use crate::token::TokenSet;

/// OAuth2 Authorization Code flow client.
///
/// Builds the requests of the flow from a static [`ClientConfig`] and runs token
/// exchanges through a [`TokenTransport`]. Cloning is cheap, the configuration is shared.
///
/// # Example
///
/// ```rust
/// use codegrant_core::{ClientConfig, ClientIdentity, EndpointConfig, OAuth2Client};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let identity = ClientIdentity::builder("client-id", "client-secret")
///     .with_scope("user,repo")
///     .with_redirect_uri("app.example://github.com/callback")?
///     .with_post_logout_redirect_uri("app.example://github.com/logout_callback")?
///     .build()?;
/// let client = OAuth2Client::new(ClientConfig::new(EndpointConfig::github(), identity));
///
/// let request = client.build_authorization_request();
/// assert_eq!(request.scope(), "user,repo");
/// let _open_in_browser = request.to_url();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    config: SharedClientConfig,
}

impl OAuth2Client {
    /// Creates a client for the given configuration.
    pub fn new(config: impl Into<SharedClientConfig>) -> Self {
        Self {
            config: config.into(),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        self.config.inner()
    }

    fn endpoints(&self) -> Arc<EndpointConfig> {
        Arc::clone(&self.config().endpoints)
    }

    /// Builds the authorization request: `response_type=code`, configured scope and
    /// redirect URI, fresh `state` and PKCE pair.
    pub fn build_authorization_request(&self) -> AuthorizationRequest {
        let config = self.config();
        let identity = config.identity();
        AuthorizationRequest::new(
            self.endpoints(),
            identity.client_id(),
            identity.redirect_uri().clone(),
            identity.scope(),
            config.pkce(),
        )
    }

    /// Builds the logout request with the configured post-logout redirect URI.
    pub fn build_end_session_request(&self) -> EndSessionRequest {
        EndSessionRequest::new(
            self.endpoints(),
            self.config().identity().post_logout_redirect_uri().clone(),
            None,
        )
    }

    /// Builds the logout request for the session identified by `id_token`.
    pub fn build_end_session_request_with_hint(
        &self,
        id_token: impl Into<SecureString>,
    ) -> EndSessionRequest {
        EndSessionRequest::new(
            self.endpoints(),
            self.config().identity().post_logout_redirect_uri().clone(),
            Some(id_token.into()),
        )
    }

    /// Builds a `refresh_token` grant request.
    ///
    /// The token is not validated, the token endpoint rejects a bad one.
    pub fn build_refresh_request(&self, refresh_token: impl Into<SecureString>) -> TokenRequest {
        let identity = self.config().identity();
        TokenRequest::refresh(
            self.endpoints(),
            identity.client_id(),
            identity.scope(),
            refresh_token.into(),
        )
    }

    /// Builds the `authorization_code` grant request for a redirect callback.
    pub fn build_code_exchange_request(&self, response: &AuthorizationResponse) -> TokenRequest {
        TokenRequest::authorization_code(
            self.endpoints(),
            self.config().identity().client_id(),
            response.code().clone(),
            response.redirect_uri().clone(),
            response.code_verifier().cloned(),
        )
    }

    /// Client credentials for the configured authentication method.
    pub fn client_authentication(&self) -> ClientAuthentication {
        let config = self.config();
        ClientAuthentication::new(
            config.authentication_method(),
            config.identity().client_id(),
            config.identity().client_secret().clone(),
        )
    }

    /// Runs `request` through `transport` with the configured client authentication.
    ///
    /// See [`exchange_token`] for the error and panic contract.
    pub async fn exchange_token<T>(
        &self,
        transport: &T,
        request: TokenRequest,
    ) -> Result<TokenSet, T::Error>
    where
        T: TokenTransport + ?Sized,
    {
        exchange_token(transport, request, self.client_authentication()).await
    }
}
