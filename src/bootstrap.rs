//! Console bootstrap
//!
//! Wires settings, the API client and the identity session together. The
//! session is fully initialized before `start` returns, so nothing that needs
//! a user is shown while initialization is still pending.

use tracing::info;

use crate::adapters::api_client::ApiClient;
use crate::config::Settings;
use crate::domain::auth::{AuthConfig, AuthSession, IdentityProvider};

pub struct Console {
    settings: Settings,
    api: ApiClient,
}

/// An initialized identity session plus the location to replace the current
/// one with after a login redirect
pub struct Started<P> {
    pub session: AuthSession<P>,
    pub redirect_to: Option<String>,
}

impl Console {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let api = ApiClient::new(&settings.console)?;
        Ok(Self { settings, api })
    }

    /// Document title, when one is configured
    pub fn title(&self) -> Option<&str> {
        self.settings.console.title.as_deref()
    }

    /// Identity provider settings from config, or from the server when absent
    pub async fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        match &self.settings.auth {
            Some(auth) => Ok(auth.clone()),
            None => self.api.fetch_auth_config().await,
        }
    }

    /// Build the identity provider and initialize the session
    pub async fn start<P, F>(&self, make_provider: F, search: &str, pathname: &str) -> anyhow::Result<Started<P>>
    where
        P: IdentityProvider,
        F: FnOnce(AuthConfig) -> P,
    {
        let auth = self.auth_config().await?;
        info!(domain = %auth.domain, "starting identity session");

        let mut session = AuthSession::new(make_provider(auth));
        let redirect_to = session.initialize(search, pathname).await?;

        Ok(Started { session, redirect_to })
    }
}
