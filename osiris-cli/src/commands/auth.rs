//! Sign in and sign out.

use anyhow::{Context, Result};
use clap::Args;
use inquire::{Password, Text};
use osiris_core::Credentials;
use osiris_fetch::Transport;
use osiris_portal::sign_in;
use osiris_store::TokenStore;
use tracing::info;

use super::emit;
use crate::output::{ActionOutput, TextFormatter};
use crate::session::Session;
use crate::{Cli, ExitCode, SIGN_IN_AGAIN};

/// Arguments for the sign_in command.
#[derive(Args, Default)]
pub struct SignInArgs {
    /// Student number; prompted for when omitted.
    #[arg(long, short)]
    pub username: Option<String>,
}

/// Prompts for credentials, runs the sign-in handshake and stores the token.
pub async fn sign_in_cmd(args: &SignInArgs, cli: &Cli) -> Result<()> {
    let session = Session::load().await?;

    let username = match &args.username {
        Some(username) => username.clone(),
        None => Text::new("s-number")
            .prompt()
            .context("Failed to read s-number")?,
    };
    let password = Password::new("password")
        .without_confirmation()
        .prompt()
        .context("Failed to read password")?;
    let credentials = Credentials::new(username, password);

    let transport = session.transport()?;
    if sign_in_and_store(&transport, &credentials, session.tokens()).await? {
        return emit(cli, &ActionOutput::new("sign_in", true), |f| {
            f.success("sign in successful")
        });
    }

    emit(cli, &failure_output(), failure_text)?;
    std::process::exit(ExitCode::Error as i32);
}

// The failed hop is only in the debug log.
fn failure_output() -> ActionOutput {
    ActionOutput::new("sign_in", false).with_message(SIGN_IN_AGAIN)
}

fn failure_text(f: &TextFormatter) -> String {
    format!("{}\n{}", f.failure("sign in failed"), f.note(SIGN_IN_AGAIN))
}

/// Runs the handshake and stores the token only if one was issued.
///
/// Returns whether a token was stored. A failed handshake leaves the token
/// file untouched.
pub(crate) async fn sign_in_and_store<T>(
    transport: &T,
    credentials: &Credentials,
    tokens: &TokenStore,
) -> Result<bool>
where
    T: Transport + ?Sized,
{
    let Ok(token) = sign_in(transport, credentials).await else {
        return Ok(false);
    };
    tokens.save(&token).await.context("Failed to store token")?;
    info!(path = %tokens.path().display(), "Token stored");
    Ok(true)
}

/// Forgets the stored token.
pub async fn sign_out_cmd(cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let removed = session.tokens().clear().await.context("Failed to remove token")?;
    let message = if removed { "Signed out" } else { "Not signed in" };
    emit(
        cli,
        &ActionOutput::new("sign_out", true).with_message(message),
        |_| message.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use osiris_core::BearerToken;
    use osiris_fetch::{FetchError, HttpRequest, HttpResponse};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers each request with the next queued response.
    struct Replay(Mutex<VecDeque<HttpResponse>>);

    impl Replay {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self(Mutex::new(responses.into()))
        }
    }

    #[async_trait]
    impl Transport for Replay {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, FetchError> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| FetchError::Connect("no response left".to_string()))
        }
    }

    fn login_page() -> HttpResponse {
        HttpResponse::new(
            200,
            "https://conext.authenticatie.ru.nl/simplesaml/module.php/core/loginuserpass.php?AuthState=_abc",
            "",
        )
    }

    fn saml_form(fields: &str) -> HttpResponse {
        HttpResponse::new(200, "https://engine.surfconext.nl/", format!("<form>{fields}</form>"))
    }

    fn credentials() -> Credentials {
        Credentials::new("s1234567", "hunter2")
    }

    fn store(dir: &TempDir) -> TokenStore {
        TokenStore::with_path(dir.path().join(".osiris_token"))
    }

    #[test]
    fn test_failure_report_is_generic() {
        let text = failure_text(&TextFormatter::new(false));
        assert_eq!(text, format!("sign in failed\n{SIGN_IN_AGAIN}"));

        let json = serde_json::to_value(failure_output()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], SIGN_IN_AGAIN);
    }

    #[tokio::test]
    async fn test_token_stored_after_four_hops() {
        let dir = TempDir::new().unwrap();
        let tokens = store(&dir);
        let transport = Replay::new(vec![
            login_page(),
            saml_form(r#"<input type="hidden" name="SAMLResponse" value="S1" />"#),
            saml_form(
                r#"<input type="hidden" name="SAMLResponse" value="S2" /><input type="hidden" name="RelayState" value="R" />"#,
            ),
            HttpResponse::new(200, "https://ru.osiris-student.nl/#access_token=TOKEN-1&token_type=bearer", ""),
        ]);

        let stored = sign_in_and_store(&transport, &credentials(), &tokens).await.unwrap();

        assert!(stored);
        assert_eq!(tokens.load().await.unwrap().unwrap().as_str(), "TOKEN-1");
    }

    #[tokio::test]
    async fn test_rejected_credentials_store_nothing() {
        let dir = TempDir::new().unwrap();
        let tokens = store(&dir);
        let transport = Replay::new(vec![
            login_page(),
            HttpResponse::new(401, "https://conext.authenticatie.ru.nl/", "wrong password"),
        ]);

        let stored = sign_in_and_store(&transport, &credentials(), &tokens).await.unwrap();

        assert!(!stored);
        assert!(!tokens.path().exists());
        assert!(tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_previous_token() {
        let dir = TempDir::new().unwrap();
        let tokens = store(&dir);
        tokens.save(&BearerToken::new("OLD").unwrap()).await.unwrap();
        let transport = Replay::new(vec![login_page(), saml_form("no assertion here")]);

        let stored = sign_in_and_store(&transport, &credentials(), &tokens).await.unwrap();

        assert!(!stored);
        assert_eq!(tokens.load().await.unwrap().unwrap().as_str(), "OLD");
    }
}
