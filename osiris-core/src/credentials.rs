//! Sign-in credentials and the bearer token they are exchanged for.
//!
//! Both hold secrets, so their `Debug` output is redacted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Credentials
// ============================================================================

/// Student number and password for one sign-in attempt. Never persisted.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials. The username is trimmed.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// The student number (including the leading `s`).
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Bearer Token
// ============================================================================

/// Opaque access token for the student API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a token, rejecting empty or whitespace-only strings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` for an empty token.
    pub fn new(token: impl Into<String>) -> Result<Self, CoreError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(CoreError::InvalidData("empty bearer token".to_string()));
        }
        Ok(Self(token))
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl TryFrom<String> for BearerToken {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BearerToken> for String {
    fn from(token: BearerToken) -> Self {
        token.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(<{} chars>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_rejects_empty() {
        assert!(BearerToken::new("").is_err());
        assert!(BearerToken::new("  \n").is_err());
        assert_eq!(BearerToken::new(" abc\n").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_bearer_token_header_and_debug() {
        let token = BearerToken::new("secret-token").unwrap();
        assert_eq!(token.authorization(), "Bearer secret-token");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn test_bearer_token_serde() {
        let token: BearerToken = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""abc""#);
        assert!(serde_json::from_str::<BearerToken>(r#""""#).is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new(" s1234567 ", "hunter2");
        assert_eq!(creds.username(), "s1234567");
        assert_eq!(creds.password(), "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("s1234567"));
        assert!(!rendered.contains("hunter2"));
    }
}
