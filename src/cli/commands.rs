use anyhow::{Result, bail};
use frontend::{AuthService, Clock, Dashboard, StorageService, SupabaseClient, SystemClock};
use model::Session;
use std::sync::Arc;
use tracing::debug;

use crate::config::AppConfig;
use crate::output::OutputFormat;

pub mod auth;
pub mod contracts;
pub mod dashboard;
pub mod interactive;
pub mod vendors;

pub const NOT_SIGNED_IN: &str = "Not signed in. Run `vendorconnect signin` first.";

/// Backend handles and output settings shared by every command.
#[derive(Clone)]
pub struct Context {
    pub auth: Arc<dyn AuthService>,
    pub storage: Arc<dyn StorageService>,
    pub clock: Arc<dyn Clock>,
    pub output: OutputFormat,
}

impl Context {
    pub fn new(
        auth: Arc<dyn AuthService>,
        storage: Arc<dyn StorageService>,
        clock: Arc<dyn Clock>,
        output: OutputFormat,
    ) -> Self {
        Self {
            auth,
            storage,
            clock,
            output,
        }
    }

    /// Connects to the configured project. One client serves both the
    /// auth and the table calls so they share a session.
    pub fn from_config(config: &AppConfig, output: OutputFormat) -> Result<Self> {
        let settings = config.client_settings()?;
        debug!(url = %settings.base_url, "Using backend");
        let client = Arc::new(SupabaseClient::new(settings)?);
        Ok(Self::new(client.clone(), client, Arc::new(SystemClock), output))
    }

    pub async fn require_session(&self) -> Result<Session> {
        match self.auth.current_session().await {
            Some(session) => Ok(session),
            None => bail!(NOT_SIGNED_IN),
        }
    }

    /// A dashboard filled from the backend. Requires a signed-in user.
    pub async fn load_dashboard(&self) -> Result<Dashboard> {
        self.require_session().await?;
        let mut dashboard = Dashboard::new(self.auth.clone(), self.storage.clone(), self.clock.clone());
        dashboard.refresh().await;
        Ok(dashboard)
    }

    pub async fn signed_in_email(&self) -> Option<String> {
        self.auth
            .current_session()
            .await
            .and_then(|session| session.user.email)
    }
}
