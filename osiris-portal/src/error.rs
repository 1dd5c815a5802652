//! Portal errors.

use osiris_core::CoreError;
use osiris_fetch::{ExtractError, FetchError};
use thiserror::Error;

use crate::auth::{FailureKind, HandshakeFailure, HandshakeStep};

/// Errors from signing in and from the student API.
#[derive(Debug, Error)]
pub enum PortalError {
    /// No bearer token is available.
    #[error("Not signed in")]
    NoCredentials,

    /// A sign-in hop returned an unexpected status or could not be sent.
    #[error("Sign in failed at {step}: {reason}")]
    HandshakeStepFailed {
        /// Hop that failed.
        step: HandshakeStep,
        /// What went wrong.
        reason: String,
    },

    /// A sign-in hop response lacked a required value.
    #[error("Sign in failed at {step}: {source}")]
    ExtractionFailed {
        /// Hop that failed.
        step: HandshakeStep,
        /// Missing value.
        source: ExtractError,
    },

    /// The portal could not be reached.
    #[error("Osiris is unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The API rejected the bearer token.
    #[error("Token rejected by Osiris")]
    Unauthorized,

    /// The API returned a non-success status.
    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus {
        /// HTTP status.
        status: u16,
        /// API path that was requested.
        path: String,
    },

    /// Transport error.
    #[error("Request failed: {0}")]
    Fetch(FetchError),

    /// Response JSON did not match the expected shape.
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// Core model error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PortalError {
    /// Returns true if signing in again would fix this error.
    pub fn needs_sign_in(&self) -> bool {
        matches!(self, Self::NoCredentials | Self::Unauthorized)
    }
}

impl From<FetchError> for PortalError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Json(e) => PortalError::Json(e),
            e if e.is_unavailable() => PortalError::UpstreamUnavailable(e.to_string()),
            e => PortalError::Fetch(e),
        }
    }
}

impl From<HandshakeFailure> for PortalError {
    fn from(failure: HandshakeFailure) -> Self {
        let step = failure.step;
        match failure.kind {
            FailureKind::Extraction(source) => PortalError::ExtractionFailed { step, source },
            FailureKind::Transport(e) if e.is_unavailable() => {
                PortalError::UpstreamUnavailable(e.to_string())
            }
            kind => PortalError::HandshakeStepFailed {
                step,
                reason: kind.to_string(),
            },
        }
    }
}
