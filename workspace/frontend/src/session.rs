//! Current-identity store and its on-disk persistence.
//!
//! The store is a last-value-wins channel: the auth client publishes every
//! sign-in, token refresh and sign-out, and views subscribe for as long as
//! they are mounted.

use model::{AuthUser, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::error::ClientError;

/// Process-wide observable holding the signed-in session, if any.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Replaces the current session and notifies every subscriber.
    pub fn publish(&self, session: Option<Session>) {
        match &session {
            Some(s) => debug!(user_id = %s.user.id, "Publishing session"),
            None => debug!("Publishing signed-out state"),
        }
        self.tx.send_replace(session);
    }

    pub fn subscribe(&self) -> SessionSubscription {
        trace!("New session subscriber");
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live subscription to [`SessionStore`] changes. Dropping it (or calling
/// [`SessionSubscription::unsubscribe`]) ends the subscription.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    /// Waits for the next change and returns the user it carries. Returns
    /// `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Option<AuthUser>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().as_ref().map(|s| s.user.clone()))
    }

    /// Whether a change arrived since the last [`changed`](Self::changed).
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// The user as of the latest notification.
    pub fn latest(&self) -> Option<AuthUser> {
        self.rx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn unsubscribe(self) {
        trace!("Session subscriber dropped");
    }
}

/// JSON file holding the persisted session between runs.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. A missing file is `Ok(None)`; a corrupt
    /// one is discarded with a warning.
    pub async fn load(&self) -> Result<Option<Session>, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "No stored session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Session>(&raw) {
            Ok(session) => {
                debug!(path = %self.path.display(), "Loaded stored session");
                Ok(Some(session))
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Discarding unreadable session file: {}", e);
                self.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, raw).await?;
        info!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
