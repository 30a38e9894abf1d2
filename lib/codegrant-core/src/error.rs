//! Error types.
//!
//! Request builders never fail: every value they read has been validated when the
//! [`ClientConfig`](crate::ClientConfig) was built. Failures are limited to configuration,
//! redirect callback parsing, and the default HTTP transport.

use reqwest::StatusCode;

/// Errors raised while building a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum ConfigError {
    /// A configured URI cannot be parsed.
    #[display("Invalid {name} '{url}': {reason}")]
    InvalidUrl {
        /// The configuration entry holding the URI.
        name: &'static str,
        /// The rejected value.
        url: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required configuration entry was not provided.
    #[display("Missing required configuration: {name}")]
    Missing {
        /// The missing entry.
        name: &'static str,
    },
}

/// Errors raised while reading the authorization redirect callback.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthorizationError {
    /// The provider redirected back with an `error` parameter.
    #[display("Authorization denied by provider: {error}")]
    Provider {
        /// The RFC 6749 error code.
        error: String,
        /// Optional human-readable description.
        description: Option<String>,
    },

    /// The `state` parameter is missing or does not match the request.
    #[display("Authorization callback state does not match the request")]
    StateMismatch,

    /// The callback carries no `code` parameter.
    #[display("Authorization callback has no code")]
    MissingCode,
}

/// Errors produced by [`HttpTokenTransport`](crate::HttpTokenTransport).
///
/// [`exchange_token`](crate::exchange_token) hands these to the caller unchanged.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportError {
    /// Network or protocol failure from reqwest.
    #[display("Token request failed: {_0}")]
    Http(reqwest::Error),

    /// The form body could not be encoded.
    #[display("Cannot encode token request: {_0}")]
    Encode(serde_urlencoded::ser::Error),

    /// The client credentials cannot be carried in an `Authorization` header.
    #[display("Invalid client authentication header: {_0}")]
    Header(http::header::InvalidHeaderValue),

    /// The token endpoint answered with a body that is not a valid token response.
    #[display("Invalid token response: {_0}")]
    Json(serde_json::Error),

    /// The token endpoint rejected the request with an RFC 6749 error body.
    #[display("Token endpoint rejected the request ({status}): {error}")]
    #[from(skip)]
    Provider {
        /// HTTP status of the response.
        status: StatusCode,
        /// The RFC 6749 error code (`invalid_grant`, `bad_verification_code`, ...).
        error: String,
        /// Optional human-readable description.
        description: Option<String>,
    },

    /// The token endpoint answered with a non-success status and no error body.
    #[display("Token endpoint answered {status}: {body}")]
    #[from(skip)]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
}
