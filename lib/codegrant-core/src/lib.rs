//! # Codegrant Core
//!
//! OAuth2 Authorization Code flow client.
//!
//! The crate builds the requests of the flow from a static configuration and turns a
//! callback-style token transport into a plain `async` call:
//! - **[`OAuth2Client::build_authorization_request`]** - URL to open in the browser
//! - **[`AuthorizationResponse::from_redirect`]** - read the redirect callback
//! - **[`OAuth2Client::build_code_exchange_request`]** / **[`OAuth2Client::build_refresh_request`]** - token requests
//! - **[`OAuth2Client::exchange_token`]** - run a token request, get a [`TokenSet`]
//! - **[`OAuth2Client::build_end_session_request`]** - logout URL
//!
//! Browser presentation and token storage are left to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codegrant_core::{
//!     AuthorizationResponse, ClientConfig, HttpTokenTransport, OAuth2Client,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OAuth2Client::new(ClientConfig::from_env()?);
//! let transport = HttpTokenTransport::new()?;
//!
//! let authorization = client.build_authorization_request();
//! let browser_url = authorization.to_url();
//! # let callback: url::Url = browser_url.clone();
//! // ... the user logs in, the provider redirects to `callback` ...
//!
//! let response = AuthorizationResponse::from_redirect(&callback, &authorization)?;
//! let request = client.build_code_exchange_request(&response);
//! let tokens = client.exchange_token(&transport, request).await?;
//!
//! // later
//! let refresh = client.build_refresh_request(tokens.refresh_token());
//! let tokens = client.exchange_token(&transport, refresh).await?;
//! # let _ = tokens;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom transports
//!
//! Any callback-based HTTP stack can be plugged in by implementing [`TokenTransport`];
//! [`HttpTokenTransport`] is the reqwest-based default. Its errors reach the caller
//! unchanged.

mod auth;
mod client;
mod config;
mod error;
mod exchange;
mod request;
mod response;
mod secure;
mod token;
mod transport;

pub use self::auth::{AuthenticationMethod, ClientAuthentication};
pub use self::client::OAuth2Client;
pub use self::config::{
    ClientConfig, ClientIdentity, ClientIdentityBuilder, ENV_AUTHORIZATION_ENDPOINT, ENV_CLIENT_ID,
    ENV_CLIENT_SECRET, ENV_END_SESSION_ENDPOINT, ENV_POST_LOGOUT_REDIRECT_URI, ENV_REDIRECT_URI,
    ENV_SCOPE, ENV_TOKEN_ENDPOINT, EndpointConfig, SharedClientConfig,
};
pub use self::error::{AuthorizationError, ConfigError, TransportError};
pub use self::exchange::{TokenCompletion, TokenTransport, exchange_token};
pub use self::request::{
    AuthorizationRequest, EndSessionRequest, GrantType, Pkce, ResponseType, TokenRequest,
};
pub use self::response::AuthorizationResponse;
pub use self::secure::SecureString;
pub use self::token::{TokenResponse, TokenSet};
pub use self::transport::HttpTokenTransport;
