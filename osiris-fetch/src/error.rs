//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Could not connect to the host.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request (including its redirects) timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Redirect chain exceeded the limit.
    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    /// URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request or redirect target outside the allowed domains.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Sign-in URLs carry the password in the query
        let err = err.without_url();
        if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else {
            FetchError::Http(err)
        }
    }
}

impl FetchError {
    /// Returns true if the portal could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_))
            || matches!(self, Self::Http(e) if e.is_timeout() || e.is_request())
    }
}

// ============================================================================
// Extract Error
// ============================================================================

/// Error type for value extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The marker (or its value opener) does not occur in the input.
    #[error("{field} not found")]
    NotFound {
        /// Name of the extracted field.
        field: &'static str,
    },

    /// The value has no closing delimiter.
    #[error("{field} is not terminated")]
    Unterminated {
        /// Name of the extracted field.
        field: &'static str,
    },

    /// The marker is present but the value is empty.
    #[error("{field} is empty")]
    Empty {
        /// Name of the extracted field.
        field: &'static str,
    },

    /// The value is not valid percent-encoded UTF-8.
    #[error("{field} could not be decoded")]
    Decode {
        /// Name of the extracted field.
        field: &'static str,
    },
}

impl ExtractError {
    /// Name of the field that could not be extracted.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotFound { field }
            | Self::Unterminated { field }
            | Self::Empty { field }
            | Self::Decode { field } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_field() {
        let err = ExtractError::NotFound { field: "SAMLResponse" };
        assert_eq!(err.field(), "SAMLResponse");
        assert_eq!(err.to_string(), "SAMLResponse not found");
    }

    #[test]
    fn test_unavailable() {
        assert!(FetchError::Timeout(30).is_unavailable());
        assert!(FetchError::Connect("refused".into()).is_unavailable());
        assert!(!FetchError::TooManyRedirects(10).is_unavailable());
    }
}
