//! Default [`TokenTransport`] backed by reqwest.

use std::time::Duration;

use oauth2::basic::BasicErrorResponse;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::{debug, warn};

use crate::auth::ClientAuthentication;
use crate::error::TransportError;
use crate::exchange::{TokenCompletion, TokenTransport};
use crate::request::TokenRequest;
use crate::token::TokenResponse;

/// Default timeout of a token request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// reqwest-based token transport.
///
/// Each request runs on a task spawned on the current tokio runtime. Redirects are
/// not followed, a token endpoint has no business redirecting a POST carrying secrets.
#[derive(Debug, Clone)]
pub struct HttpTokenTransport {
    http: reqwest::Client,
}

impl HttpTokenTransport {
    /// Creates a transport with the default 30 seconds timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { http })
    }

    /// Wraps an existing reqwest client, as configured by the caller.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn send(
        http: reqwest::Client,
        request: TokenRequest,
        authentication: ClientAuthentication,
    ) -> Result<TokenResponse, TransportError> {
        let mut params = request.form_parameters();
        params.extend(authentication.form_parameters());
        let body = serde_urlencoded::to_string(&params)?;

        let mut builder = http
            .post(request.token_endpoint().clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(body);
        if let Some(value) = authentication.authorization_header()? {
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%status, "token endpoint answered");

        // GitHub answers `200 OK` with an error body, so look for one whatever the status
        if let Ok(error) = serde_json::from_slice::<BasicErrorResponse>(&bytes) {
            warn!(%status, error = %error.error(), "token endpoint rejected the request");
            return Err(TransportError::Provider {
                status,
                error: error.error().to_string(),
                description: error.error_description().cloned(),
            });
        }

        if !status.is_success() {
            warn!(%status, "token endpoint failed");
            return Err(TransportError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let token = serde_json::from_slice::<TokenResponse>(&bytes)?;
        Ok(token)
    }
}

impl TokenTransport for HttpTokenTransport {
    type Error = TransportError;

    fn perform_token_request(
        &self,
        request: TokenRequest,
        authentication: ClientAuthentication,
        completion: TokenCompletion<Self::Error>,
    ) {
        let http = self.http.clone();
        tokio::spawn(async move {
            match Self::send(http, request, authentication).await {
                Ok(response) => completion.succeed(response),
                Err(error) => completion.fail(error),
            }
        });
    }
}
