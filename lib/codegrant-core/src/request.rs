//! Request value objects.
//!
//! Requests are fully built by [`OAuth2Client`](crate::OAuth2Client) and never mutated
//! afterwards. Each one keeps a handle on the shared [`EndpointConfig`].

use std::fmt;
use std::sync::Arc;

use oauth2::{CsrfToken, PkceCodeChallenge};
use url::Url;

use crate::config::EndpointConfig;
use crate::secure::SecureString;

/// OAuth2 `response_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Authorization Code grant.
    Code,
}

impl ResponseType {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth2 `grant_type` of a token request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    /// Exchange of an authorization code.
    AuthorizationCode,
    /// Refresh of an access token.
    RefreshToken,
}

impl GrantType {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PKCE pair (RFC 7636), S256 only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    challenge: String,
    method: String,
    verifier: SecureString,
}

impl Pkce {
    pub(crate) fn random() -> Self {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        Self {
            challenge: challenge.as_str().to_string(),
            method: challenge.method().as_str().to_string(),
            verifier: SecureString::new(verifier.secret().as_str()),
        }
    }

    /// The `code_challenge` sent with the authorization request.
    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// The `code_challenge_method`, always `S256`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The `code_verifier` to send with the code exchange.
    pub fn verifier(&self) -> &SecureString {
        &self.verifier
    }
}

fn random_state() -> String {
    CsrfToken::new_random().secret().clone()
}

/// Request sent to the authorization endpoint, through the user's browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    endpoints: Arc<EndpointConfig>,
    client_id: String,
    response_type: ResponseType,
    redirect_uri: Url,
    scope: String,
    state: String,
    pkce: Option<Pkce>,
}

impl AuthorizationRequest {
    pub(crate) fn new(
        endpoints: Arc<EndpointConfig>,
        client_id: impl Into<String>,
        redirect_uri: Url,
        scope: impl Into<String>,
        pkce: bool,
    ) -> Self {
        Self {
            endpoints,
            client_id: client_id.into(),
            response_type: ResponseType::Code,
            redirect_uri,
            scope: scope.into(),
            state: random_state(),
            pkce: pkce.then(Pkce::random),
        }
    }

    /// The endpoints this request targets.
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// The client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Always [`ResponseType::Code`].
    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    /// Where the provider sends the code back.
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// The requested scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The CSRF `state`, checked again on the redirect callback.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The PKCE pair, if enabled.
    pub fn pkce(&self) -> Option<&Pkce> {
        self.pkce.as_ref()
    }

    /// The URL to open in the browser.
    pub fn to_url(&self) -> Url {
        let mut url = self.endpoints.authorization_endpoint().clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", self.response_type.as_str())
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", self.redirect_uri.as_str());
            if !self.scope.is_empty() {
                query.append_pair("scope", &self.scope);
            }
            query.append_pair("state", &self.state);
            if let Some(pkce) = &self.pkce {
                query
                    .append_pair("code_challenge", pkce.challenge())
                    .append_pair("code_challenge_method", pkce.method());
            }
        }
        url
    }
}

/// Request sent to the end-session endpoint, through the user's browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndSessionRequest {
    endpoints: Arc<EndpointConfig>,
    post_logout_redirect_uri: Url,
    state: String,
    id_token_hint: Option<SecureString>,
}

impl EndSessionRequest {
    pub(crate) fn new(
        endpoints: Arc<EndpointConfig>,
        post_logout_redirect_uri: Url,
        id_token_hint: Option<SecureString>,
    ) -> Self {
        Self {
            endpoints,
            post_logout_redirect_uri,
            state: random_state(),
            id_token_hint,
        }
    }

    /// The endpoints this request targets.
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// Where the provider redirects after logout.
    pub fn post_logout_redirect_uri(&self) -> &Url {
        &self.post_logout_redirect_uri
    }

    /// The `state` echoed back on the post-logout redirect.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The ID token identifying the session to end, if any.
    pub fn id_token_hint(&self) -> Option<&SecureString> {
        self.id_token_hint.as_ref()
    }

    /// The URL to open in the browser.
    pub fn to_url(&self) -> Url {
        let mut url = self.endpoints.end_session_endpoint().clone();
        {
            let mut query = url.query_pairs_mut();
            if let Some(hint) = &self.id_token_hint {
                query.append_pair("id_token_hint", hint.as_str());
            }
            query
                .append_pair(
                    "post_logout_redirect_uri",
                    self.post_logout_redirect_uri.as_str(),
                )
                .append_pair("state", &self.state);
        }
        url
    }
}

/// Request sent to the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    endpoints: Arc<EndpointConfig>,
    client_id: String,
    grant_type: GrantType,
    scope: String,
    refresh_token: Option<SecureString>,
    code: Option<SecureString>,
    redirect_uri: Option<Url>,
    code_verifier: Option<SecureString>,
}

impl TokenRequest {
    pub(crate) fn refresh(
        endpoints: Arc<EndpointConfig>,
        client_id: impl Into<String>,
        scope: impl Into<String>,
        refresh_token: SecureString,
    ) -> Self {
        Self {
            endpoints,
            client_id: client_id.into(),
            grant_type: GrantType::RefreshToken,
            scope: scope.into(),
            refresh_token: Some(refresh_token),
            code: None,
            redirect_uri: None,
            code_verifier: None,
        }
    }

    pub(crate) fn authorization_code(
        endpoints: Arc<EndpointConfig>,
        client_id: impl Into<String>,
        code: SecureString,
        redirect_uri: Url,
        code_verifier: Option<SecureString>,
    ) -> Self {
        Self {
            endpoints,
            client_id: client_id.into(),
            grant_type: GrantType::AuthorizationCode,
            scope: String::new(),
            refresh_token: None,
            code: Some(code),
            redirect_uri: Some(redirect_uri),
            code_verifier,
        }
    }

    /// The endpoints this request targets.
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// Shortcut for the token endpoint.
    pub fn token_endpoint(&self) -> &Url {
        self.endpoints.token_endpoint()
    }

    /// The client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The grant type.
    pub fn grant_type(&self) -> GrantType {
        self.grant_type
    }

    /// The requested scope, empty for a code exchange.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The refresh token, for [`GrantType::RefreshToken`].
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(SecureString::as_str)
    }

    /// The authorization code, for [`GrantType::AuthorizationCode`].
    pub fn code(&self) -> Option<&str> {
        self.code.as_ref().map(SecureString::as_str)
    }

    /// The redirect URI used to obtain the code.
    pub fn redirect_uri(&self) -> Option<&Url> {
        self.redirect_uri.as_ref()
    }

    /// The PKCE verifier matching the authorization request.
    pub fn code_verifier(&self) -> Option<&str> {
        self.code_verifier.as_ref().map(SecureString::as_str)
    }

    /// Form parameters of the request body.
    ///
    /// Client credentials are not included, see
    /// [`ClientAuthentication::form_parameters`](crate::ClientAuthentication::form_parameters).
    pub fn form_parameters(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("grant_type", self.grant_type.as_str().to_string())];

        if let Some(code) = &self.code {
            params.push(("code", code.as_str().to_string()));
        }
        if let Some(redirect_uri) = &self.redirect_uri {
            params.push(("redirect_uri", redirect_uri.to_string()));
        }
        if let Some(verifier) = &self.code_verifier {
            params.push(("code_verifier", verifier.as_str().to_string()));
        }
        if let Some(refresh_token) = &self.refresh_token {
            params.push(("refresh_token", refresh_token.as_str().to_string()));
        }
        if !self.scope.is_empty() {
            params.push(("scope", self.scope.clone()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn endpoints() -> Arc<EndpointConfig> {
        Arc::new(
            EndpointConfig::new(
                "https://auth.example.com/authorize?audience=api",
                "https://auth.example.com/token",
                "https://auth.example.com/logout",
            )
            .expect("Should build endpoints"),
        )
    }

    fn redirect_uri() -> Url {
        Url::parse("app.example://github.com/callback").expect("Should parse")
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn should_render_authorization_url() {
        let request =
            AuthorizationRequest::new(endpoints(), "client-id", redirect_uri(), "user,repo", true);
        let url = request.to_url();
        let params = query(&url);

        assert_eq!(url.path(), "/authorize");
        assert_eq!(params["audience"], "api");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "client-id");
        assert_eq!(params["redirect_uri"], "app.example://github.com/callback");
        assert_eq!(params["scope"], "user,repo");
        assert_eq!(params["state"], request.state());

        let pkce = request.pkce().expect("Should have PKCE");
        assert_eq!(params["code_challenge"], pkce.challenge());
        assert_eq!(params["code_challenge_method"], "S256");
    }

    #[test]
    fn should_omit_empty_scope_and_disabled_pkce() {
        let request =
            AuthorizationRequest::new(endpoints(), "client-id", redirect_uri(), "", false);
        let params = query(&request.to_url());

        assert!(request.pkce().is_none());
        assert!(!params.contains_key("scope"));
        assert!(!params.contains_key("code_challenge"));
    }

    #[test]
    fn should_generate_fresh_state_and_verifier() {
        let first = AuthorizationRequest::new(endpoints(), "client-id", redirect_uri(), "", true);
        let second = AuthorizationRequest::new(endpoints(), "client-id", redirect_uri(), "", true);

        assert_ne!(first.state(), second.state());
        let first_pkce = first.pkce().expect("Should have PKCE");
        let second_pkce = second.pkce().expect("Should have PKCE");
        assert_ne!(first_pkce.verifier(), second_pkce.verifier());
        assert!(first_pkce.verifier().as_str().len() >= 43);
    }

    #[test]
    fn should_render_end_session_url() {
        let logout = Url::parse("app.example://github.com/logout_callback").expect("Should parse");
        let request =
            EndSessionRequest::new(endpoints(), logout, Some(SecureString::from("id-token")));
        let params = query(&request.to_url());

        assert_eq!(
            params["post_logout_redirect_uri"],
            "app.example://github.com/logout_callback"
        );
        assert_eq!(params["id_token_hint"], "id-token");
        assert_eq!(params["state"], request.state());
    }

    #[test]
    fn should_render_refresh_form() {
        let request = TokenRequest::refresh(
            endpoints(),
            "client-id",
            "user,repo",
            SecureString::from("refresh-1"),
        );

        assert_eq!(request.grant_type(), GrantType::RefreshToken);
        assert_eq!(request.refresh_token(), Some("refresh-1"));
        assert_eq!(
            request.token_endpoint().as_str(),
            "https://auth.example.com/token"
        );
        assert_eq!(
            request.form_parameters(),
            vec![
                ("grant_type", "refresh_token".to_string()),
                ("refresh_token", "refresh-1".to_string()),
                ("scope", "user,repo".to_string()),
            ]
        );
    }

    #[test]
    fn should_render_code_exchange_form() {
        let request = TokenRequest::authorization_code(
            endpoints(),
            "client-id",
            SecureString::from("code-1"),
            redirect_uri(),
            Some(SecureString::from("verifier-1")),
        );

        assert_eq!(request.grant_type(), GrantType::AuthorizationCode);
        assert_eq!(
            request.form_parameters(),
            vec![
                ("grant_type", "authorization_code".to_string()),
                ("code", "code-1".to_string()),
                (
                    "redirect_uri",
                    "app.example://github.com/callback".to_string()
                ),
                ("code_verifier", "verifier-1".to_string()),
            ]
        );
    }
}
