//! Signing in to Osiris.
//!
//! [`Handshake`] performs the four sign-in hops and reports the first
//! failure as a [`HandshakeFailure`]. [`sign_in`] wraps it for callers that
//! only care whether a token came out.

mod handshake;

pub use handshake::{FailureKind, Handshake, HandshakeFailure, HandshakeState, HandshakeStep};

use osiris_core::{BearerToken, Credentials};
use osiris_fetch::Transport;
use tracing::{debug, instrument};

use crate::error::PortalError;

/// Exchanges credentials for a bearer token.
///
/// The token is not stored; persisting it is up to the caller.
///
/// # Errors
///
/// Returns the failed hop mapped to a [`PortalError`].
#[instrument(skip(transport, credentials), fields(username = %credentials.username()))]
pub async fn sign_in<T>(transport: &T, credentials: &Credentials) -> Result<BearerToken, PortalError>
where
    T: Transport + ?Sized,
{
    let mut handshake = Handshake::new(transport, credentials);
    match handshake.run().await {
        Ok(token) => {
            debug!("Sign in succeeded");
            Ok(token)
        }
        Err(failure) => {
            debug!(step = %failure.step, error = %failure.kind, "Sign in failed");
            Err(failure.into())
        }
    }
}
