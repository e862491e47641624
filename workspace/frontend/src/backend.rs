//! Seams to the hosted backend: one trait for auth, one for table storage.
//!
//! [`crate::api_client::SupabaseClient`] implements both over HTTP; tests
//! use the in-memory backend.

use async_trait::async_trait;
use model::{AuthUser, RowId, Session};
use serde_json::Value;
use std::fmt;

use crate::error::ClientError;
use crate::session::SessionSubscription;

/// Tables the dashboard reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Vendors,
    Contracts,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Vendors => "vendors",
            Table::Contracts => "contracts",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// `ORDER BY column direction` for a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl Order {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// PostgREST `order` parameter value, e.g. `created_at.desc`.
    pub fn to_query(&self) -> String {
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        format!("{}.{}", self.column, direction)
    }
}

/// What a successful sign-up produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    /// `true` when the backend auto-confirmed the account and a session was
    /// started; otherwise the user still has to sign in.
    pub signed_in: bool,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, ClientError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    /// Ends the session. The local session is dropped even when the remote
    /// call fails.
    async fn sign_out(&self) -> Result<(), ClientError>;

    /// The usable session, restoring or refreshing a stored one if needed.
    async fn current_session(&self) -> Option<Session>;

    /// Subscribes to session changes until the subscription is dropped.
    fn subscribe(&self) -> SessionSubscription;
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// All rows visible to the current user. A `null` body is an empty list.
    async fn select_all(&self, table: Table, order: Order) -> Result<Vec<Value>, ClientError>;

    async fn insert(&self, table: Table, row: Value) -> Result<(), ClientError>;

    /// Applies `patch` to the row whose `id` equals `id`.
    async fn update(&self, table: Table, patch: Value, id: &RowId) -> Result<(), ClientError>;
}
