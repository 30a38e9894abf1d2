use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sensitive string (client secret, refresh token, PKCE verifier) zeroed on drop.
///
/// The value never shows up in `Debug` output, and `Display` only shows a masked form,
/// so requests and configurations can be traced without leaking credentials.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps the provided value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// Avoid keeping the returned reference around longer than needed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn masked(&self) -> String {
        let value = self.0.as_str();
        let count = value.chars().count();
        if count <= 8 {
            return "***".to_string();
        }
        let head = value.chars().take(4).collect::<String>();
        let tail = value.chars().skip(count - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
