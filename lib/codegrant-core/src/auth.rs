//! Client authentication at the token endpoint (RFC 6749 §2.3).

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;
use http::header::InvalidHeaderValue;
use url::form_urlencoded;

use crate::secure::SecureString;

/// How the client proves its identity to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthenticationMethod {
    /// Client secret in the form body.
    #[default]
    ClientSecretPost,
    /// Client secret in an HTTP Basic `Authorization` header.
    ClientSecretBasic,
    /// Public client, `client_id` only.
    None,
}

/// Credentials attached to a token request.
#[derive(Clone, PartialEq, Eq)]
pub enum ClientAuthentication {
    /// `client_id` and `client_secret` sent as form parameters.
    ClientSecretPost {
        /// The client id.
        client_id: String,
        /// The client secret.
        client_secret: SecureString,
    },
    /// `client_id` and `client_secret` sent as HTTP Basic credentials.
    ClientSecretBasic {
        /// The client id.
        client_id: String,
        /// The client secret.
        client_secret: SecureString,
    },
    /// No secret, `client_id` sent as a form parameter.
    None {
        /// The client id.
        client_id: String,
    },
}

impl ClientAuthentication {
    /// Builds the credentials for `method`.
    pub fn new(
        method: AuthenticationMethod,
        client_id: impl Into<String>,
        client_secret: SecureString,
    ) -> Self {
        let client_id = client_id.into();
        match method {
            AuthenticationMethod::ClientSecretPost => Self::ClientSecretPost {
                client_id,
                client_secret,
            },
            AuthenticationMethod::ClientSecretBasic => Self::ClientSecretBasic {
                client_id,
                client_secret,
            },
            AuthenticationMethod::None => Self::None { client_id },
        }
    }

    /// The authentication method.
    pub fn method(&self) -> AuthenticationMethod {
        match self {
            Self::ClientSecretPost { .. } => AuthenticationMethod::ClientSecretPost,
            Self::ClientSecretBasic { .. } => AuthenticationMethod::ClientSecretBasic,
            Self::None { .. } => AuthenticationMethod::None,
        }
    }

    /// Parameters to append to the token request form body.
    pub fn form_parameters(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::ClientSecretPost {
                client_id,
                client_secret,
            } => vec![
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.as_str().to_string()),
            ],
            Self::ClientSecretBasic { .. } => Vec::new(),
            Self::None { client_id } => vec![("client_id", client_id.clone())],
        }
    }

    /// Value of the `Authorization` header, for `client_secret_basic` only.
    ///
    /// Id and secret are form-urlencoded before base64 encoding (RFC 6749 §2.3.1).
    ///
    /// # Errors
    ///
    /// Returns an error if the encoded credentials are not a valid header value.
    pub fn authorization_header(&self) -> Result<Option<HeaderValue>, InvalidHeaderValue> {
        let Self::ClientSecretBasic {
            client_id,
            client_secret,
        } = self
        else {
            return Ok(None);
        };

        let id = form_urlencoded::byte_serialize(client_id.as_bytes()).collect::<String>();
        let secret =
            form_urlencoded::byte_serialize(client_secret.as_str().as_bytes()).collect::<String>();
        let encoded = STANDARD.encode(format!("{id}:{secret}"));

        let mut value = HeaderValue::try_from(format!("Basic {encoded}"))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }
}

impl fmt::Debug for ClientAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let client_id = match self {
            Self::ClientSecretPost { client_id, .. }
            | Self::ClientSecretBasic { client_id, .. }
            | Self::None { client_id } => client_id,
        };
        f.debug_struct("ClientAuthentication")
            .field("method", &self.method())
            .field("client_id", client_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_post_secret_in_form_body() {
        let auth = ClientAuthentication::new(
            AuthenticationMethod::ClientSecretPost,
            "client-id",
            SecureString::from("client-secret"),
        );

        assert_eq!(
            auth.form_parameters(),
            vec![
                ("client_id", "client-id".to_string()),
                ("client_secret", "client-secret".to_string()),
            ]
        );
        assert!(matches!(auth.authorization_header(), Ok(None)));
    }

    #[test]
    fn should_send_basic_header() {
        let auth = ClientAuthentication::new(
            AuthenticationMethod::ClientSecretBasic,
            "client-id",
            SecureString::from("client-secret"),
        );

        assert!(auth.form_parameters().is_empty());
        let header = auth
            .authorization_header()
            .expect("Should be a valid header")
            .expect("Should have a header");
        // base64("client-id:client-secret")
        assert_eq!(
            header.to_str().expect("Should be ascii"),
            "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ="
        );
        assert!(header.is_sensitive());
    }

    #[test]
    fn should_urlencode_basic_credentials() {
        let auth = ClientAuthentication::new(
            AuthenticationMethod::ClientSecretBasic,
            "id",
            SecureString::from("a:b"),
        );

        let header = auth
            .authorization_header()
            .expect("Should be a valid header")
            .expect("Should have a header");
        // base64("id:a%3Ab")
        assert_eq!(
            header.to_str().expect("Should be ascii"),
            "Basic aWQ6YSUzQWI="
        );
    }

    #[test]
    fn should_encode_control_characters_in_basic_credentials() {
        let auth = ClientAuthentication::new(
            AuthenticationMethod::ClientSecretBasic,
            "id\r\n",
            SecureString::from("se\0cret\u{7f}"),
        );

        let header = auth
            .authorization_header()
            .expect("Should be a valid header")
            .expect("Should have a header");
        let encoded = header
            .to_str()
            .expect("Should be ascii")
            .strip_prefix("Basic ")
            .expect("Should be a basic header");
        let decoded = STANDARD.decode(encoded).expect("Should be base64");
        assert_eq!(decoded, b"id%0D%0A:se%00cret%7F");
    }

    #[test]
    fn should_send_only_client_id_for_public_client() {
        let auth = ClientAuthentication::new(
            AuthenticationMethod::None,
            "client-id",
            SecureString::from("ignored"),
        );

        assert_eq!(auth.method(), AuthenticationMethod::None);
        assert_eq!(
            auth.form_parameters(),
            vec![("client_id", "client-id".to_string())]
        );
    }

    #[test]
    fn should_redact_debug_output() {
        let auth = ClientAuthentication::new(
            AuthenticationMethod::ClientSecretPost,
            "client-id",
            SecureString::from("super-secret"),
        );

        let debug_str = format!("{auth:?}");
        assert!(debug_str.contains("client-id"));
        assert!(!debug_str.contains("super-secret"));
    }
}
