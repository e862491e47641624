use anyhow::{Context, Result};
use config::{Config, Environment, File};
use frontend::ClientSettings;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default tracing filter when neither `RUST_LOG` nor `log_filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "vendorconnect=info,frontend=info";

/// Optional config file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "vendorconnect";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {key}: set {env} or pass {flag}")]
    Missing {
        key: &'static str,
        env: &'static str,
        flag: &'static str,
    },
}

/// Application configuration, layered from defaults, the optional
/// `vendorconnect.toml`, `SUPABASE_URL`/`SUPABASE_KEY` and
/// `VENDORCONNECT_*` variables (highest wins).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_key: Option<String>,
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Loads `.env`, then the layered configuration from the process
    /// environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_sources(config_file, std::env::vars().collect())
    }

    /// Builds the configuration from an explicit environment map.
    pub fn from_sources(config_file: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let credentials: HashMap<String, String> = env
            .iter()
            .filter(|(key, _)| key.as_str() == "SUPABASE_URL" || key.as_str() == "SUPABASE_KEY")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let settings = Config::builder()
            .set_default("request_timeout_secs", ClientSettings::DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(file)
            .add_source(Environment::default().source(Some(credentials)))
            .add_source(Environment::with_prefix("VENDORCONNECT").source(Some(env)))
            .build()
            .context("Failed to read configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        if config.session_file.is_none() {
            config.session_file = default_session_file();
        }
        Ok(config)
    }

    /// Connection settings for the backend client. Both credentials are
    /// required.
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        let url = self
            .supabase_url
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "supabase_url",
                env: "SUPABASE_URL",
                flag: "--supabase-url",
            })?;
        let key = self
            .supabase_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "supabase_key",
                env: "SUPABASE_KEY",
                flag: "--supabase-key",
            })?;

        let mut settings = ClientSettings::new(url.trim(), key.trim())
            .with_timeout(Duration::from_secs(self.request_timeout_secs));
        if let Some(path) = &self.session_file {
            settings = settings.with_session_file(path);
        }
        Ok(settings)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

/// `<config dir>/vendorconnect/session.json`
pub fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vendorconnect").join("session.json"))
}
