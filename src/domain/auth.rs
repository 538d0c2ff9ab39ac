//! Identity session
//!
//! The identity provider itself is an external client behind
//! [`IdentityProvider`]; [`AuthSession`] keeps the state the console shell
//! needs (user, initialization, popup) and decides where a login redirect
//! lands.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info};

/// Identity provider client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub domain: String,
    pub client_id: String,
    pub audience: String,
}

/// State carried through a login redirect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectState {
    #[serde(default)]
    pub target_url: Option<String>,
}

/// Profile of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Complete a login redirect and return the state passed to it
    async fn handle_redirect_callback(&self) -> anyhow::Result<RedirectState>;
    async fn is_authenticated(&self) -> anyhow::Result<bool>;
    async fn get_user(&self) -> anyhow::Result<Option<AuthUser>>;
    async fn login_with_popup(&self) -> anyhow::Result<()>;
    async fn login_with_redirect(&self, state: RedirectState) -> anyhow::Result<()>;
    async fn get_token_silently(&self) -> anyhow::Result<Option<String>>;
    async fn logout(&self) -> anyhow::Result<()>;
}

/// Location to show after a login redirect.
///
/// Targets are hash routes with the `#` turned into `/` by the provider, so
/// `/query` on `/console.html` becomes `/console.html#query`.
pub fn redirect_path(pathname: &str, state: &RedirectState) -> String {
    match state.target_url.as_deref() {
        Some(target) if target.starts_with('/') => format!("{}#{}", pathname, &target[1..]),
        _ => pathname.to_string(),
    }
}

pub struct AuthSession<P> {
    provider: P,
    user: Option<AuthUser>,
    is_authenticated: bool,
    is_initializing: bool,
    is_popup_open: bool,
}

impl<P: IdentityProvider> AuthSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            user: None,
            is_authenticated: false,
            is_initializing: true,
            is_popup_open: false,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_initializing(&self) -> bool {
        self.is_initializing
    }

    pub fn is_popup_open(&self) -> bool {
        self.is_popup_open
    }

    /// Finish any pending redirect login, then load the current user.
    ///
    /// `search` is the page query string; a `code=` parameter marks a
    /// redirect back from the provider. Returns the location to replace the
    /// current one with when a redirect was handled.
    pub async fn initialize(&mut self, search: &str, pathname: &str) -> anyhow::Result<Option<String>> {
        let mut location = None;

        if search.contains("code=") {
            let state = match self.provider.handle_redirect_callback().await {
                Ok(state) => state,
                Err(e) => {
                    error!(error = %e, "failed to handle login redirect");
                    RedirectState::default()
                }
            };
            location = Some(redirect_path(pathname, &state));
        }

        if self.provider.is_authenticated().await? {
            self.user = self.provider.get_user().await?;
            self.is_authenticated = true;
            info!(user = ?self.user.as_ref().map(|u| &u.sub), "session restored");
        }

        self.is_initializing = false;
        Ok(location)
    }

    /// Log in through a popup; failures are logged and leave the session as it was
    pub async fn login_with_popup(&mut self) {
        self.is_popup_open = true;
        let result = self.provider.login_with_popup().await;
        self.is_popup_open = false;

        if let Err(e) = result {
            error!(error = %e, "popup login failed");
            return;
        }

        match self.provider.get_user().await {
            Ok(user) => {
                self.user = user;
                self.is_authenticated = true;
            }
            Err(e) => error!(error = %e, "failed to load user after popup login"),
        }
    }

    pub async fn handle_redirect_callback(&mut self) -> anyhow::Result<RedirectState> {
        self.is_initializing = true;
        let outcome = async {
            let state = self.provider.handle_redirect_callback().await?;
            let user = self.provider.get_user().await?;
            Ok::<_, anyhow::Error>((state, user))
        }
        .await;
        self.is_initializing = false;

        let (state, user) = outcome?;
        self.user = user;
        self.is_authenticated = true;
        Ok(state)
    }

    pub async fn login_with_redirect(&self, state: RedirectState) -> anyhow::Result<()> {
        self.provider.login_with_redirect(state).await
    }

    pub async fn get_token_silently(&self) -> anyhow::Result<Option<String>> {
        self.provider.get_token_silently().await
    }

    pub async fn logout(&mut self) -> anyhow::Result<()> {
        self.provider.logout().await?;
        self.user = None;
        self.is_authenticated = false;
        Ok(())
    }
}
