//! Token endpoint responses and the normalized token triple.

use std::fmt;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Successful token endpoint response as sent by the provider.
///
/// Every member is optional: providers differ in what they return, and
/// [`TokenSet`] takes care of the normalization.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct TokenResponse {
    /// The access token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// The refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// The OpenID Connect ID token.
    #[serde(default)]
    pub id_token: Option<String>,
    /// The token type, usually `bearer`.
    #[serde(default)]
    #[zeroize(skip)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    #[zeroize(skip)]
    pub expires_in: Option<u64>,
    /// Granted scope.
    #[serde(default)]
    #[zeroize(skip)]
    pub scope: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("TokenResponse")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("id_token", &redact(&self.id_token))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Access, refresh and ID tokens returned by a token exchange.
///
/// A token the provider did not send is the empty string, never absent.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TokenSet {
    access_token: String,
    refresh_token: String,
    id_token: String,
}

impl TokenSet {
    /// Creates a token set.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        id_token: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            id_token: id_token.into(),
        }
    }

    /// The access token, empty if the provider sent none.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The refresh token, empty if the provider sent none.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// The ID token, empty if the provider sent none.
    pub fn id_token(&self) -> &str {
        &self.id_token
    }
}

impl From<TokenResponse> for TokenSet {
    fn from(mut response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token.take().unwrap_or_default(),
            refresh_token: response.refresh_token.take().unwrap_or_default(),
            id_token: response.id_token.take().unwrap_or_default(),
        }
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("TokenSet")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("id_token", &redact(&self.id_token))
            .finish()
    }
}
