//! The four-hop sign-in handshake.
//!
//! ## Flow
//!
//! 1. **Authorize**: GET the OAuth authorize endpoint. It redirects to the
//!    university login page, whose URL carries `AuthState`.
//! 2. **Submit credentials**: POST username, password and `AuthState` to the
//!    login page. The response is an auto-submit form holding a SAML response.
//! 3. **Consume assertion**: POST the SAML response to the federation hub,
//!    sending only its `main` and `HTTPSERVERID` cookies. The response is a
//!    second auto-submit form with a new SAML response and a relay state.
//! 4. **Issue token**: POST both to the authorize endpoint. It redirects to the
//!    app with `access_token` in the URL fragment.
//!
//! Each hop consumes exactly what the previous one produced. The first
//! failure ends the handshake; nothing is retried and nothing is logged here.

use osiris_core::{BearerToken, Credentials};
use osiris_fetch::extract::{ACCESS_TOKEN, AUTH_STATE, RELAY_STATE, SAML_RESPONSE};
use osiris_fetch::{CookieJar, ExtractError, FetchError, HttpRequest, HttpResponse, Transport};
use std::fmt;
use thiserror::Error;

use crate::endpoints::{
    ASSERTION_COOKIES, AUTHORIZE_URL, CLIENT_ID, CONSUME_ASSERTION_URL, LOGIN_URL, REDIRECT_URI,
};

// ============================================================================
// States and Steps
// ============================================================================

/// Where a handshake is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Nothing sent yet.
    Start,
    /// Login page reached, `AuthState` known.
    AuthorizedRedirect,
    /// Credentials accepted, first SAML response known.
    CredentialsSubmitted,
    /// Assertion consumed, second SAML response and relay state known.
    AssertionConsumed,
    /// Bearer token issued.
    TokenIssued,
    /// A hop failed.
    Failed,
}

/// A hop of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    /// Hop 1.
    Authorize,
    /// Hop 2.
    SubmitCredentials,
    /// Hop 3.
    ConsumeAssertion,
    /// Hop 4.
    IssueToken,
}

impl HandshakeStep {
    /// Hop number, starting at 1.
    pub fn number(self) -> u8 {
        match self {
            Self::Authorize => 1,
            Self::SubmitCredentials => 2,
            Self::ConsumeAssertion => 3,
            Self::IssueToken => 4,
        }
    }

    /// State reached when this hop succeeds.
    pub fn reaches(self) -> HandshakeState {
        match self {
            Self::Authorize => HandshakeState::AuthorizedRedirect,
            Self::SubmitCredentials => HandshakeState::CredentialsSubmitted,
            Self::ConsumeAssertion => HandshakeState::AssertionConsumed,
            Self::IssueToken => HandshakeState::TokenIssued,
        }
    }
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorize => "authorize",
            Self::SubmitCredentials => "submit credentials",
            Self::ConsumeAssertion => "consume assertion",
            Self::IssueToken => "issue token",
        };
        write!(f, "hop {} ({name})", self.number())
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Why a hop failed.
#[derive(Debug, Error)]
pub enum FailureKind {
    /// The hop ended in a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),

    /// A value the next hop needs was missing from the response.
    #[error(transparent)]
    Extraction(ExtractError),

    /// The request could not be completed.
    #[error(transparent)]
    Transport(FetchError),

    /// The extracted token was unusable.
    #[error("{0}")]
    InvalidToken(String),
}

/// A failed handshake: the hop and the reason.
#[derive(Debug, Error)]
#[error("{step} failed: {kind}")]
pub struct HandshakeFailure {
    /// Hop that failed.
    pub step: HandshakeStep,
    /// Reason.
    pub kind: FailureKind,
}

// ============================================================================
// Handshake
// ============================================================================

/// One sign-in attempt.
///
/// Owns the cookie jar for the attempt; dropping the handshake drops every
/// intermediate value with it.
pub struct Handshake<'a, T: Transport + ?Sized> {
    transport: &'a T,
    credentials: &'a Credentials,
    jar: CookieJar,
    state: HandshakeState,
}

impl<'a, T: Transport + ?Sized> Handshake<'a, T> {
    /// Creates a handshake in the `Start` state.
    pub fn new(transport: &'a T, credentials: &'a Credentials) -> Self {
        Self {
            transport,
            credentials,
            jar: CookieJar::new(),
            state: HandshakeState::Start,
        }
    }

    /// Current state.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Cookies collected so far.
    pub fn cookies(&self) -> &CookieJar {
        &self.jar
    }

    /// Runs all four hops.
    ///
    /// # Errors
    ///
    /// Returns the first hop failure. No token is produced in that case.
    pub async fn run(&mut self) -> Result<BearerToken, HandshakeFailure> {
        let outcome = self.run_hops().await;
        self.state = match &outcome {
            Ok(_) => HandshakeState::TokenIssued,
            Err(_) => HandshakeState::Failed,
        };
        outcome
    }

    async fn run_hops(&mut self) -> Result<BearerToken, HandshakeFailure> {
        let auth_state = self.authorize().await?;
        let saml_response = self.submit_credentials(&auth_state).await?;
        let (saml_response, relay_state) = self.consume_assertion(&saml_response).await?;
        self.issue_token(&saml_response, &relay_state).await
    }

    /// Hop 1: returns the decoded `AuthState`.
    async fn authorize(&mut self) -> Result<String, HandshakeFailure> {
        let step = HandshakeStep::Authorize;
        let request = HttpRequest::get(AUTHORIZE_URL)
            .query("response_type", "token")
            .query("client_id", CLIENT_ID)
            .query("redirect_uri", REDIRECT_URI);

        let response = self.exchange(step, request).await?;
        let auth_state = AUTH_STATE
            .extract_decoded(&response.final_url)
            .map_err(|e| fail(step, FailureKind::Extraction(e)))?;
        self.advance(step);
        Ok(auth_state)
    }

    /// Hop 2: returns the first SAML response.
    async fn submit_credentials(&mut self, auth_state: &str) -> Result<String, HandshakeFailure> {
        let step = HandshakeStep::SubmitCredentials;
        let request = HttpRequest::post(LOGIN_URL)
            .query("username", self.credentials.username())
            .query("password", self.credentials.password())
            .query("submit", "Login")
            .query("AuthState", auth_state);
        let cookies = request
            .host()
            .map(|host| self.jar.for_host(&host))
            .unwrap_or_default();
        let request = request.cookies(cookies);

        let response = self.exchange(step, request).await?;
        let saml_response = extract(step, &SAML_RESPONSE, &response.body)?;
        self.advance(step);
        Ok(saml_response)
    }

    /// Hop 3: returns the second SAML response and the relay state.
    async fn consume_assertion(
        &mut self,
        saml_response: &str,
    ) -> Result<(String, String), HandshakeFailure> {
        let step = HandshakeStep::ConsumeAssertion;
        let request = HttpRequest::post(CONSUME_ASSERTION_URL)
            .form_field("SAMLResponse", saml_response)
            .cookies(self.jar.named(ASSERTION_COOKIES));

        let response = self.exchange(step, request).await?;
        let saml_response = extract(step, &SAML_RESPONSE, &response.body)?;
        let relay_state = extract(step, &RELAY_STATE, &response.body)?;
        self.advance(step);
        Ok((saml_response, relay_state))
    }

    /// Hop 4: returns the bearer token.
    async fn issue_token(
        &mut self,
        saml_response: &str,
        relay_state: &str,
    ) -> Result<BearerToken, HandshakeFailure> {
        let step = HandshakeStep::IssueToken;
        let request = HttpRequest::post(AUTHORIZE_URL)
            .form_field("SAMLResponse", saml_response)
            .form_field("RelayState", relay_state);

        let response = self.exchange(step, request).await?;
        let token = extract(step, &ACCESS_TOKEN, &response.final_url)?;
        let token = BearerToken::new(token)
            .map_err(|e| fail(step, FailureKind::InvalidToken(e.to_string())))?;
        self.advance(step);
        Ok(token)
    }

    /// Sends one hop, absorbs its cookies and checks its status.
    async fn exchange(
        &mut self,
        step: HandshakeStep,
        request: HttpRequest,
    ) -> Result<HttpResponse, HandshakeFailure> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| fail(step, FailureKind::Transport(e)))?;
        self.jar.absorb(response.set_cookies.iter().cloned());

        if !response.is_success() {
            return Err(fail(step, FailureKind::Status(response.status)));
        }
        Ok(response)
    }

    fn advance(&mut self, step: HandshakeStep) {
        self.state = step.reaches();
    }
}

impl<T: Transport + ?Sized> fmt::Debug for Handshake<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handshake")
            .field("credentials", self.credentials)
            .field("jar", &self.jar)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn fail(step: HandshakeStep, kind: FailureKind) -> HandshakeFailure {
    HandshakeFailure { step, kind }
}

fn extract(
    step: HandshakeStep,
    extraction: &osiris_fetch::Extraction,
    text: &str,
) -> Result<String, HandshakeFailure> {
    extraction
        .extract(text)
        .map(str::to_string)
        .map_err(|e| fail(step, FailureKind::Extraction(e)))
}
