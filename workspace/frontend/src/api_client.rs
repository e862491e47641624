//! HTTP client for the hosted backend (auth service + table service).
//!
//! [`SupabaseClient`] implements [`crate::backend::AuthService`] (see
//! [`auth`]) and [`crate::backend::StorageService`] (see [`storage`]). The
//! typed wrappers in [`vendor`] and [`contract`] work against any
//! `StorageService`.

pub mod auth;
pub mod contract;
pub mod storage;
pub mod vendor;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::ClientError;
use crate::session::{SessionFile, SessionStore};
use crate::settings::ClientSettings;

/// Client for one hosted project. Cheap to clone; clones share the HTTP
/// connection pool and the session store.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    settings: ClientSettings,
    sessions: SessionStore,
    session_file: Option<SessionFile>,
    /// Held while a stored session is restored or refreshed, so concurrent
    /// callers spend the refresh token once.
    session_lock: Arc<Mutex<()>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.settings.base_url)
            .field("session_file", &self.session_file)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let session_file = settings.session_file.clone().map(SessionFile::new);
        debug!(base_url = %settings.api_base_url(), "Created backend client");

        Ok(Self {
            http,
            settings,
            sessions: SessionStore::new(),
            session_file,
            session_lock: Arc::new(Mutex::new(())),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Attaches the `apikey` and `Authorization` headers. The bearer is the
    /// user's access token when signed in, the anon key otherwise.
    fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.settings.api_key);
        request
            .header("apikey", &self.settings.api_key)
            .bearer_auth(bearer)
    }

    /// Sends a request and turns non-2xx answers into [`ClientError::Api`].
    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        debug!("{} request to: {}", method, url);

        let response = request.send().await.map_err(|e| {
            error!("{} {} - Request failed: {}", method, url, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} {} - Non-OK response: {}", method, url, status);
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::from_body(status.as_u16(), &body);
            error!("{} {} - API error: {}", method, url, err);
            return Err(err);
        }

        info!("{} {} - Success", method, url);
        Ok(response)
    }

    /// Reads a JSON body. An empty body decodes as JSON `null`.
    async fn parse<T: DeserializeOwned>(method: &str, url: &str, response: Response) -> Result<T, ClientError> {
        trace!("{} {} - Response received, parsing JSON", method, url);
        let raw = response.bytes().await?;
        let raw: &[u8] = if raw.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &raw
        };
        serde_json::from_slice(raw).map_err(|e| {
            error!("{} {} - Failed to parse response: {}", method, url, e);
            ClientError::from(e)
        })
    }
}

/// Decodes table rows one by one, skipping (and logging) rows that do not
/// fit `T` so one bad record does not empty the whole list.
pub(crate) fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(table, index, "Skipping undecodable row: {}", e);
                None
            }
        })
        .collect();
    if decoded.len() != total {
        warn!(table, kept = decoded.len(), total, "Some rows were skipped");
    }
    decoded
}


#[cfg(test)]
mod tests {
    use super::*;
    use model::Vendor;
    use serde_json::json;

    #[test]
    fn test_decode_rows_skips_bad_rows() {
        let rows = vec![
            json!({"id": 1, "name": "Acme", "total_spend": 10}),
            json!({"name": "missing id"}),
            json!({"id": "v-2", "name": "Globex"}),
        ];
        let vendors: Vec<Vendor> = decode_rows("vendors", rows);
        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[1].name, "Globex");
    }

    #[test]
    fn test_debug_hides_keys() {
        let client = test_support::client("http://localhost:54321");
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("localhost:54321"));
        assert!(!rendered.contains(test_support::ANON_KEY));
    }
}
