//! Static client configuration.
//!
//! The configuration is built once, validated once, then shared read-only through
//! [`SharedClientConfig`] by the client and every request it produces.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::auth::AuthenticationMethod;
use crate::error::ConfigError;
use crate::secure::SecureString;

/// Environment variable holding the authorization endpoint.
pub const ENV_AUTHORIZATION_ENDPOINT: &str = "OAUTH_AUTHORIZATION_ENDPOINT";
/// Environment variable holding the token endpoint.
pub const ENV_TOKEN_ENDPOINT: &str = "OAUTH_TOKEN_ENDPOINT";
/// Environment variable holding the end-session endpoint.
pub const ENV_END_SESSION_ENDPOINT: &str = "OAUTH_END_SESSION_ENDPOINT";
/// Environment variable holding the client id.
pub const ENV_CLIENT_ID: &str = "OAUTH_CLIENT_ID";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "OAUTH_CLIENT_SECRET";
/// Environment variable holding the scope (optional).
pub const ENV_SCOPE: &str = "OAUTH_SCOPE";
/// Environment variable holding the redirect URI.
pub const ENV_REDIRECT_URI: &str = "OAUTH_REDIRECT_URI";
/// Environment variable holding the post-logout redirect URI.
pub const ENV_POST_LOGOUT_REDIRECT_URI: &str = "OAUTH_POST_LOGOUT_REDIRECT_URI";

fn parse_url(name: &'static str, value: impl AsRef<str>) -> Result<Url, ConfigError> {
    let value = value.as_ref();
    Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        name,
        url: value.to_string(),
        reason: err.to_string(),
    })
}

/// Authorization server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    authorization_endpoint: Url,
    token_endpoint: Url,
    end_session_endpoint: Url,
}

impl EndpointConfig {
    /// Creates the endpoint configuration from the three provider URIs.
    pub fn new(
        authorization_endpoint: impl AsRef<str>,
        token_endpoint: impl AsRef<str>,
        end_session_endpoint: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            authorization_endpoint: parse_url("authorization endpoint", authorization_endpoint)?,
            token_endpoint: parse_url("token endpoint", token_endpoint)?,
            end_session_endpoint: parse_url("end-session endpoint", end_session_endpoint)?,
        })
    }

    /// GitHub OAuth App endpoints.
    pub fn github() -> Self {
        Self::new(
            "https://github.com/login/oauth/authorize",
            "https://github.com/login/oauth/access_token",
            "https://github.com/logout",
        )
        .unwrap_or_else(|err| unreachable!("GitHub endpoints are valid URLs: {err}"))
    }

    /// The authorization endpoint (user-facing redirect).
    pub fn authorization_endpoint(&self) -> &Url {
        &self.authorization_endpoint
    }

    /// The token endpoint.
    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    /// The end-session (logout) endpoint.
    pub fn end_session_endpoint(&self) -> &Url {
        &self.end_session_endpoint
    }
}

/// Registered client identity.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    client_id: String,
    client_secret: SecureString,
    scope: String,
    redirect_uri: Url,
    post_logout_redirect_uri: Url,
}

impl ClientIdentity {
    /// Starts building an identity with the required credentials.
    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> ClientIdentityBuilder {
        ClientIdentityBuilder {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: String::new(),
            redirect_uri: None,
            post_logout_redirect_uri: None,
        }
    }

    /// The client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret.
    pub fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }

    /// The scope string, sent verbatim (`"user,repo"`, `"openid profile"`, ...).
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Where the provider sends the authorization code.
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Where the provider redirects after logout.
    pub fn post_logout_redirect_uri(&self) -> &Url {
        &self.post_logout_redirect_uri
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field(
                "post_logout_redirect_uri",
                &self.post_logout_redirect_uri.as_str(),
            )
            .finish()
    }
}

/// Builder for [`ClientIdentity`].
#[derive(Debug, Clone)]
pub struct ClientIdentityBuilder {
    client_id: String,
    client_secret: SecureString,
    scope: String,
    redirect_uri: Option<Url>,
    post_logout_redirect_uri: Option<Url>,
}

impl ClientIdentityBuilder {
    /// Sets the scope string.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the redirect URI. Custom schemes (`app.example://callback`) are accepted.
    pub fn with_redirect_uri(mut self, uri: impl AsRef<str>) -> Result<Self, ConfigError> {
        self.redirect_uri = Some(parse_url("redirect URI", uri)?);
        Ok(self)
    }

    /// Sets the post-logout redirect URI.
    pub fn with_post_logout_redirect_uri(
        mut self,
        uri: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        self.post_logout_redirect_uri = Some(parse_url("post-logout redirect URI", uri)?);
        Ok(self)
    }

    /// Builds the identity; both redirect URIs are required.
    pub fn build(self) -> Result<ClientIdentity, ConfigError> {
        let redirect_uri = self.redirect_uri.ok_or(ConfigError::Missing {
            name: "redirect URI",
        })?;
        let post_logout_redirect_uri = self
            .post_logout_redirect_uri
            .ok_or(ConfigError::Missing {
                name: "post-logout redirect URI",
            })?;

        Ok(ClientIdentity {
            client_id: self.client_id,
            client_secret: self.client_secret,
            scope: self.scope,
            redirect_uri,
            post_logout_redirect_uri,
        })
    }
}

/// Complete client configuration: endpoints, identity and flow options.
///
/// Use [`ClientConfig::new`], [`ClientConfig::from_env`] or [`ClientConfig::from_lookup`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) endpoints: Arc<EndpointConfig>,
    pub(crate) identity: ClientIdentity,
    pub(crate) pkce: bool,
    pub(crate) authentication_method: AuthenticationMethod,
}

impl ClientConfig {
    /// Creates a configuration with PKCE enabled and `client_secret_post` authentication.
    pub fn new(endpoints: EndpointConfig, identity: ClientIdentity) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
            identity,
            pkce: true,
            authentication_method: AuthenticationMethod::ClientSecretPost,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// See [`ClientConfig::from_lookup`] for the variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Required: `OAUTH_AUTHORIZATION_ENDPOINT`, `OAUTH_TOKEN_ENDPOINT`,
    /// `OAUTH_END_SESSION_ENDPOINT`, `OAUTH_CLIENT_ID`, `OAUTH_CLIENT_SECRET`,
    /// `OAUTH_REDIRECT_URI`, `OAUTH_POST_LOGOUT_REDIRECT_URI`.
    /// Optional: `OAUTH_SCOPE` (defaults to no scope).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing { name });

        let endpoints = EndpointConfig::new(
            required(ENV_AUTHORIZATION_ENDPOINT)?,
            required(ENV_TOKEN_ENDPOINT)?,
            required(ENV_END_SESSION_ENDPOINT)?,
        )?;

        let identity = ClientIdentity::builder(
            required(ENV_CLIENT_ID)?,
            SecureString::new(required(ENV_CLIENT_SECRET)?),
        )
        .with_scope(lookup(ENV_SCOPE).unwrap_or_default())
        .with_redirect_uri(required(ENV_REDIRECT_URI)?)?
        .with_post_logout_redirect_uri(required(ENV_POST_LOGOUT_REDIRECT_URI)?)?
        .build()?;

        Ok(Self::new(endpoints, identity))
    }

    /// Enables or disables PKCE on authorization requests.
    #[must_use]
    pub fn with_pkce(mut self, pkce: bool) -> Self {
        self.pkce = pkce;
        self
    }

    /// Sets how the client authenticates to the token endpoint.
    #[must_use]
    pub fn with_authentication_method(mut self, method: AuthenticationMethod) -> Self {
        self.authentication_method = method;
        self
    }

    /// The authorization server endpoints.
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// The client identity.
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Whether authorization requests carry a PKCE challenge.
    pub fn pkce(&self) -> bool {
        self.pkce
    }

    /// The token endpoint authentication method.
    pub fn authentication_method(&self) -> AuthenticationMethod {
        self.authentication_method
    }
}

/// Wraps [`ClientConfig`] in an `Arc` for sharing across tasks.
#[derive(Debug, Clone)]
pub struct SharedClientConfig(pub(crate) Arc<ClientConfig>);

impl SharedClientConfig {
    /// Creates a new shared config.
    pub fn new(config: ClientConfig) -> Self {
        Self(Arc::new(config))
    }

    /// Returns a reference to the inner config.
    pub fn inner(&self) -> &ClientConfig {
        &self.0
    }
}

impl From<ClientConfig> for SharedClientConfig {
    fn from(config: ClientConfig) -> Self {
        Self::new(config)
    }
}
