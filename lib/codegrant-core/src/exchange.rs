//! Token exchange: bridges a callback-style transport into a future.
//!
//! A [`TokenTransport`] performs the HTTP call however it likes (a spawned task, a
//! platform SDK, a test fake) and reports the outcome through a [`TokenCompletion`].
//! [`exchange_token`] awaits that single completion.
//!
//! # Contract
//!
//! The transport completes exactly once, with a response or an error. Completing twice
//! cannot be expressed since [`TokenCompletion::complete`] consumes the handle.
//! Completing with neither, or dropping the handle without completing, is a bug in the
//! transport: the awaiting caller panics.
//!
//! ```rust
//! use codegrant_core::{
//!     ClientAuthentication, TokenCompletion, TokenRequest, TokenResponse, TokenTransport,
//! };
//!
//! struct Offline;
//!
//! impl TokenTransport for Offline {
//!     type Error = std::io::Error;
//!
//!     fn perform_token_request(
//!         &self,
//!         _request: TokenRequest,
//!         _authentication: ClientAuthentication,
//!         completion: TokenCompletion<Self::Error>,
//!     ) {
//!         completion.fail(std::io::Error::other("offline"));
//!     }
//! }
//! ```

use tokio::sync::oneshot;
use tracing::debug;

use crate::auth::ClientAuthentication;
use crate::request::TokenRequest;
use crate::token::{TokenResponse, TokenSet};

/// Callback-style transport able to POST a token request.
///
/// Timeouts and retries, if any, belong to the transport.
pub trait TokenTransport {
    /// Error reported by the transport, handed unchanged to the caller of
    /// [`exchange_token`].
    type Error: Send + 'static;

    /// Starts the token request and completes `completion` exactly once.
    ///
    /// The completion may be invoked synchronously, before this method returns, or
    /// later from any thread.
    fn perform_token_request(
        &self,
        request: TokenRequest,
        authentication: ClientAuthentication,
        completion: TokenCompletion<Self::Error>,
    );
}

enum Outcome<E> {
    Response(TokenResponse),
    Error(E),
    Neither,
}

/// Single-shot completion handle given to a [`TokenTransport`].
#[must_use = "the token exchange waits until the completion is invoked"]
pub struct TokenCompletion<E> {
    sender: oneshot::Sender<Outcome<E>>,
}

impl<E> TokenCompletion<E> {
    /// Reports the outcome of the token request.
    ///
    /// A response takes precedence over an error. Passing neither violates the
    /// transport contract and makes the pending exchange panic.
    pub fn complete(self, response: Option<TokenResponse>, error: Option<E>) {
        let outcome = match (response, error) {
            (Some(response), _) => Outcome::Response(response),
            (None, Some(error)) => Outcome::Error(error),
            (None, None) => Outcome::Neither,
        };
        // The exchange future may have been dropped in the meantime
        let _ = self.sender.send(outcome);
    }

    /// Reports a successful response.
    pub fn succeed(self, response: TokenResponse) {
        self.complete(Some(response), None);
    }

    /// Reports a failure.
    pub fn fail(self, error: E) {
        self.complete(None, Some(error));
    }
}

/// Performs one token request through `transport` and awaits its completion.
///
/// The provider response is normalized into a [`TokenSet`], missing tokens becoming
/// empty strings. A transport error is returned as is, without retry.
///
/// # Panics
///
/// If the transport completes with neither a response nor an error, or drops the
/// completion without invoking it.
pub async fn exchange_token<T>(
    transport: &T,
    request: TokenRequest,
    authentication: ClientAuthentication,
) -> Result<TokenSet, T::Error>
where
    T: TokenTransport + ?Sized,
{
    let (sender, receiver) = oneshot::channel();
    debug!(
        endpoint = %request.token_endpoint(),
        grant_type = %request.grant_type(),
        method = ?authentication.method(),
        "performing token request"
    );
    transport.perform_token_request(request, authentication, TokenCompletion { sender });

    match receiver.await {
        Ok(Outcome::Response(response)) => {
            debug!("token request succeeded");
            Ok(TokenSet::from(response))
        }
        Ok(Outcome::Error(error)) => {
            debug!("token request failed");
            Err(error)
        }
        Ok(Outcome::Neither) => {
            panic!("token transport completed with neither a response nor an error")
        }
        Err(_) => panic!("token transport dropped the completion without invoking it"),
    }
}
