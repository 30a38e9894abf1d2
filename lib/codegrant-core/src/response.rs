//! Authorization redirect callback.

use url::Url;

use crate::error::AuthorizationError;
use crate::request::AuthorizationRequest;
use crate::secure::SecureString;

/// Authorization code received on the redirect URI, bound to its originating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    code: SecureString,
    redirect_uri: Url,
    code_verifier: Option<SecureString>,
}

impl AuthorizationResponse {
    /// Reads the redirect callback URI produced for `request`.
    ///
    /// Provider errors take precedence; otherwise the `state` must match the request
    /// and a `code` must be present. Each of them must appear exactly once.
    pub fn from_redirect(
        callback: &Url,
        request: &AuthorizationRequest,
    ) -> Result<Self, AuthorizationError> {
        let mut codes = Vec::new();
        let mut states = Vec::new();
        let mut error = None;
        let mut description = None;
        for (key, value) in callback.query_pairs() {
            match key.as_ref() {
                "code" => codes.push(value.into_owned()),
                "state" => states.push(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => description = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(AuthorizationError::Provider { error, description });
        }
        if states != [request.state()] {
            return Err(AuthorizationError::StateMismatch);
        }
        let code = match <[String; 1]>::try_from(codes) {
            Ok([code]) if !code.is_empty() => code,
            _ => return Err(AuthorizationError::MissingCode),
        };

        Ok(Self {
            code: SecureString::new(code),
            redirect_uri: request.redirect_uri().clone(),
            code_verifier: request.pkce().map(|pkce| pkce.verifier().clone()),
        })
    }

    /// The authorization code.
    pub fn code(&self) -> &SecureString {
        &self.code
    }

    /// The redirect URI of the originating request.
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// The PKCE verifier of the originating request.
    pub fn code_verifier(&self) -> Option<&SecureString> {
        self.code_verifier.as_ref()
    }
}
