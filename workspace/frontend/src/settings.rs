use std::path::PathBuf;
use std::time::Duration;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub base_url: String,

    /// Public (anon) API key sent as the `apikey` header on every request
    pub api_key: String,

    /// Request timeout applied to the HTTP client
    pub request_timeout: Duration,

    /// Where the signed-in session is persisted between runs. `None` keeps
    /// the session in memory only.
    pub session_file: Option<PathBuf>,
}

impl ClientSettings {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            session_file: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Base URL without a trailing slash
    pub fn api_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Auth service URL for an endpoint, e.g. `/token`
    pub fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1{}", self.api_base_url(), endpoint)
    }

    /// Table endpoint URL, e.g. `/vendors`
    pub fn rest_url(&self, endpoint: &str) -> String {
        format!("{}/rest/v1{}", self.api_base_url(), endpoint)
    }
}
