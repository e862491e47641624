use thiserror::Error;

/// Errors from talking to the hosted backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An operation that needs a signed-in user was called without one.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Reading or writing the persisted session failed.
    #[error("Session storage error: {0}")]
    SessionStorage(#[from] std::io::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Builds an [`ClientError::Api`] from an error body, picking the first
    /// message field the auth or table service uses.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                ["error_description", "msg", "message", "error"]
                    .iter()
                    .find_map(|key| json.get(*key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                let body = body.trim();
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    format!("HTTP {}: {}", status, body)
                }
            });
        ClientError::Api { status, message }
    }
}
