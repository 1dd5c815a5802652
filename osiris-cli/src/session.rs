//! Per-invocation state: settings, the token file and the HTTP transport.

use anyhow::{Context, Result};
use osiris_fetch::HttpTransport;
use osiris_portal::PortalClient;
use osiris_portal::endpoints;
use osiris_store::{Settings, SettingsStore, TokenStore};
use tracing::debug;

/// Everything a command needs to talk to the portal.
pub struct Session {
    settings: Settings,
    tokens: TokenStore,
}

impl Session {
    /// Loads settings from the default location.
    pub async fn load() -> Result<Self> {
        let store = SettingsStore::load_default()
            .await
            .context("Failed to load settings")?;
        Ok(Self {
            settings: store.get().clone(),
            tokens: TokenStore::default_location(),
        })
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The token file.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// A transport limited to the portal's sign-in and API hosts.
    pub fn transport(&self) -> Result<HttpTransport> {
        let transport = HttpTransport::with_timeout(self.settings.request_timeout())
            .context("Failed to create HTTP client")?
            .with_allowed_domains(endpoints::allowed_domains());
        Ok(transport)
    }

    /// A data client carrying the stored token, if any.
    pub async fn client(&self) -> Result<PortalClient<HttpTransport>> {
        let token = self.tokens.load().await.context("Failed to read stored token")?;
        debug!(signed_in = token.is_some(), "Creating portal client");
        Ok(PortalClient::new(self.transport()?, token).with_language(self.settings.language.as_str()))
    }
}
