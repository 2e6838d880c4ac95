//! Login and logout flows.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::api::CollectionApi;
use crate::error::{Error, Result};
use crate::session::{clear_session, store_session, CredentialStore, Session};

/// Drives authentication against the collection server and owns nothing
/// but its two capabilities: the gateway and the credential store.
pub struct Authenticator {
    gateway: Arc<dyn CollectionApi>,
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(gateway: Arc<dyn CollectionApi>, store: Arc<dyn CredentialStore>) -> Self {
        Self { gateway, store }
    }

    /// Probe the server, log in and persist the issued session.
    ///
    /// The base URL is validated and stripped of trailing slashes before
    /// any request; all three inputs must be non-blank.
    pub async fn login(&self, base_url: &str, username: &str, password: &str) -> Result<()> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::InvalidInput("enter the helper address".into()));
        }
        if username.trim().is_empty() {
            return Err(Error::InvalidInput("enter a login".into()));
        }
        if password.is_empty() {
            return Err(Error::InvalidInput("enter a password".into()));
        }
        Url::parse(base_url)?;

        self.gateway.check_reachable(base_url).await?;
        info!(base_url, "server reachable, logging in");

        let issued = self.gateway.login(base_url, username.trim(), password).await?;
        store_session(
            self.store.as_ref(),
            &issued.token,
            &issued.expires_at,
            base_url,
            username.trim(),
        );
        info!(username = username.trim(), "logged in");
        Ok(())
    }

    /// Best-effort server-side logout followed by an unconditional local
    /// sign-out. A dead server never blocks clearing credentials.
    pub async fn logout(&self) {
        if let Some(session) = Session::load(self.store.as_ref()) {
            if let Err(e) = self.gateway.logout(&session).await {
                warn!(error = %e, "server logout failed, clearing local session anyway");
            }
        }
        clear_session(self.store.as_ref());
        info!("signed out");
    }
}
