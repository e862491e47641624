//! Auth service calls: sign-up, password sign-in, refresh, logout.

use async_trait::async_trait;
use model::{AuthUser, Session};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use super::SupabaseClient;
use crate::backend::{AuthService, SignUpOutcome};
use crate::error::ClientError;
use crate::session::SessionSubscription;

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl SupabaseClient {
    async fn post_auth<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.settings.auth_url(endpoint);
        let request = self.authorize(self.http.post(&url), access_token).json(body);
        self.send("POST", &url, request).await
    }

    /// Makes `session` current: stamps its expiry, publishes it and writes
    /// it to the session file.
    async fn adopt(&self, session: Session) -> Session {
        let session = session.stamp_expiry(self.clock.now());
        self.sessions.publish(Some(session.clone()));
        if let Some(file) = &self.session_file {
            if let Err(e) = file.save(&session).await {
                warn!("Failed to persist session: {}", e);
            }
        }
        session
    }

    async fn forget(&self) {
        self.sessions.publish(None);
        if let Some(file) = &self.session_file {
            if let Err(e) = file.clear().await {
                warn!("Failed to remove session file: {}", e);
            }
        }
    }

    /// The usable session from the store or the session file, refreshed
    /// when expired. Callers hold `session_lock`.
    async fn resolve_session(&self) -> Option<Session> {
        let now = self.clock.now();

        let session = match self.sessions.current() {
            Some(session) => session,
            None => {
                let file = self.session_file.as_ref()?;
                match file.load().await {
                    Ok(Some(stored)) => stored,
                    Ok(None) => return None,
                    Err(e) => {
                        warn!("Failed to read stored session: {}", e);
                        return None;
                    }
                }
            }
        };

        if !session.is_expired(now) {
            if self.sessions.current().is_none() {
                trace!("Restored stored session");
                self.sessions.publish(Some(session.clone()));
            }
            return Some(session);
        }

        debug!(user_id = %session.user.id, "Session expired, refreshing");
        match self.refresh_session(&session.refresh_token).await {
            Ok(fresh) => Some(fresh),
            Err(e) => {
                warn!("Discarding session that could not be refreshed: {}", e);
                self.forget().await;
                None
            }
        }
    }

    /// Exchanges a refresh token for a new session.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ClientError> {
        debug!("Refreshing session");
        let response = self
            .post_auth(
                "/token?grant_type=refresh_token",
                &RefreshGrant { refresh_token },
                None,
            )
            .await?;
        let session: Session = Self::parse("POST", "/token", response).await?;
        info!(user_id = %session.user.id, "Session refreshed");
        Ok(self.adopt(session).await)
    }
}

#[async_trait]
impl AuthService for SupabaseClient {
    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, ClientError> {
        debug!("Signing up");
        let response = self
            .post_auth("/signup", &PasswordGrant { email, password }, None)
            .await?;
        let body: Value = Self::parse("POST", "/signup", response).await?;

        // With auto-confirm the service answers with a full session,
        // otherwise with the bare (unconfirmed) user.
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)?;
            let session = self.adopt(session).await;
            info!(user_id = %session.user.id, "Signed up and signed in");
            return Ok(SignUpOutcome {
                user: session.user,
                signed_in: true,
            });
        }

        let user_json = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user_json)?;
        info!(user_id = %user.id, "Signed up, confirmation pending");
        Ok(SignUpOutcome {
            user,
            signed_in: false,
        })
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        debug!("Signing in");
        let response = self
            .post_auth(
                "/token?grant_type=password",
                &PasswordGrant { email, password },
                None,
            )
            .await?;
        let session: Session = Self::parse("POST", "/token", response).await?;
        let session = self.adopt(session).await;
        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), ClientError> {
        let session = self.current_session().await;
        self.forget().await;

        let Some(session) = session else {
            debug!("Sign-out without a session");
            return Ok(());
        };

        let result = self
            .post_auth("/logout", &serde_json::json!({}), Some(&session.access_token))
            .await;
        match result {
            Ok(_) => {
                info!(user_id = %session.user.id, "Signed out");
                Ok(())
            }
            Err(e) => {
                warn!("Remote logout failed, local session dropped anyway: {}", e);
                Err(e)
            }
        }
    }

    async fn current_session(&self) -> Option<Session> {
        if let Some(session) = self.sessions.current() {
            if !session.is_expired(self.clock.now()) {
                return Some(session);
            }
        }

        // Another caller may have restored or refreshed the session while
        // this one waited; `resolve_session` starts from the store again.
        let _guard = self.session_lock.lock().await;
        self.resolve_session().await
    }

    fn subscribe(&self) -> SessionSubscription {
        self.sessions.subscribe()
    }
}
