//! In-memory stand-in for the hosted backend, used by state and CLI tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{AuthUser, RowId, Session};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::backend::{AuthService, Order, SignUpOutcome, SortDirection, StorageService, Table};
use crate::error::ClientError;
use crate::session::{SessionStore, SessionSubscription};

/// 2026-01-01T00:00:00Z; inserted rows get `created_at` = this + id seconds.
const CREATED_AT_BASE: i64 = 1_767_225_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<Table, Vec<Value>>,
    failures: HashMap<(Operation, Table), String>,
    calls: HashMap<Operation, usize>,
}

/// Auth + storage backed by process memory.
#[derive(Debug)]
pub struct InMemoryBackend {
    sessions: SessionStore,
    users: Mutex<HashMap<String, (String, AuthUser)>>,
    tables: Mutex<Tables>,
    next_id: AtomicI64,
    auto_confirm: bool,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            sessions: SessionStore::new(),
            users: Mutex::new(HashMap::new()),
            tables: Mutex::new(Tables::default()),
            next_id: AtomicI64::new(1),
            auto_confirm: false,
        }
    }

    /// Sign-ups start a session right away.
    pub fn auto_confirming(mut self) -> Self {
        self.auto_confirm = true;
        self
    }

    /// Registers a confirmed account.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.register(email, password);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Replaces the rows of `table`.
    pub fn seed(&self, table: Table, rows: Vec<Value>) {
        let mut tables = self.lock_tables();
        for row in &rows {
            if let Some(id) = row.get("id").and_then(Value::as_i64) {
                self.next_id.fetch_max(id + 1, AtomicOrdering::SeqCst);
            }
        }
        tables.rows.insert(table, rows);
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock_tables().rows.get(&table).cloned().unwrap_or_default()
    }

    /// Makes every `operation` on `table` fail with `message` until
    /// [`recover`](Self::recover).
    pub fn fail(&self, operation: Operation, table: Table, message: impl Into<String>) {
        self.lock_tables()
            .failures
            .insert((operation, table), message.into());
    }

    pub fn recover(&self) {
        self.lock_tables().failures.clear();
    }

    pub fn calls(&self, operation: Operation) -> usize {
        self.lock_tables().calls.get(&operation).copied().unwrap_or(0)
    }

    fn register(&self, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            role: Some("authenticated".to_string()),
            last_sign_in_at: None,
        };
        self.lock_users()
            .insert(email.to_lowercase(), (password.to_string(), user.clone()));
        user
    }

    fn start_session(&self, user: AuthUser) -> Session {
        let n = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let session = Session {
            access_token: format!("mock-access-{}", n),
            token_type: "bearer".to_string(),
            expires_in: Some(3600),
            expires_at: None,
            refresh_token: format!("mock-refresh-{}", n),
            user,
        };
        self.sessions.publish(Some(session.clone()));
        session
    }

    /// Counts the call and returns the injected failure, if any.
    fn check(&self, operation: Operation, table: Table) -> Result<(), ClientError> {
        let mut tables = self.lock_tables();
        *tables.calls.entry(operation).or_default() += 1;
        match tables.failures.get(&(operation, table)) {
            Some(message) => Err(ClientError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_users(&self) -> std::sync::MutexGuard<'_, HashMap<String, (String, AuthUser)>> {
        match self.users.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn compare_column(a: &Value, b: &Value, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        // Nulls last, like the table service's default for ascending order.
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Greater,
        (_, Some(Value::Null) | None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn row_matches(row: &Value, id: &RowId) -> bool {
    match (row.get("id"), id) {
        (Some(Value::Number(n)), RowId::Int(i)) => n.as_i64() == Some(*i),
        (Some(Value::String(s)), RowId::Text(t)) => s == t,
        _ => false,
    }
}

#[async_trait]
impl AuthService for InMemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, ClientError> {
        if self.lock_users().contains_key(&email.to_lowercase()) {
            return Err(ClientError::Api {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        let user = self.register(email, password);
        if self.auto_confirm {
            let session = self.start_session(user);
            return Ok(SignUpOutcome {
                user: session.user,
                signed_in: true,
            });
        }
        Ok(SignUpOutcome {
            user,
            signed_in: false,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let user = self
            .lock_users()
            .get(&email.to_lowercase())
            .filter(|(stored, _)| stored == password)
            .map(|(_, user)| user.clone());
        match user {
            Some(user) => Ok(self.start_session(user)),
            None => Err(ClientError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        self.sessions.publish(None);
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    fn subscribe(&self) -> SessionSubscription {
        self.sessions.subscribe()
    }
}

#[async_trait]
impl StorageService for InMemoryBackend {
    async fn select_all(&self, table: Table, order: Order) -> Result<Vec<Value>, ClientError> {
        self.check(Operation::Select, table)?;
        let mut rows = self.rows(table);
        rows.sort_by(|a, b| {
            let ordering = compare_column(a, b, order.column);
            match order.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<(), ClientError> {
        self.check(Operation::Insert, table)?;
        let Value::Object(mut fields) = row else {
            return Err(ClientError::Api {
                status: 400,
                message: "Row must be a JSON object".to_string(),
            });
        };

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        fields.entry("id").or_insert(json!(id));
        if table == Table::Vendors {
            let created_at = DateTime::<Utc>::from_timestamp(CREATED_AT_BASE + id, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();
            fields.entry("created_at").or_insert(json!(created_at));
        }

        self.lock_tables()
            .rows
            .entry(table)
            .or_default()
            .push(Value::Object(fields));
        Ok(())
    }

    async fn update(&self, table: Table, patch: Value, id: &RowId) -> Result<(), ClientError> {
        self.check(Operation::Update, table)?;
        let Value::Object(patch) = patch else {
            return Err(ClientError::Api {
                status: 400,
                message: "Patch must be a JSON object".to_string(),
            });
        };

        let mut tables = self.lock_tables();
        let rows = tables.rows.entry(table).or_default();
        for row in rows.iter_mut().filter(|row| row_matches(row, id)) {
            if let Value::Object(fields) = row {
                for (key, value) in &patch {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_select_orders_rows() {
        let backend = InMemoryBackend::new();
        backend.seed(
            Table::Contracts,
            vec![
                json!({"id": 1, "end_date": "2027-03-01"}),
                json!({"id": 2, "end_date": null}),
                json!({"id": 3, "end_date": "2026-11-01"}),
            ],
        );

        let rows = backend
            .select_all(Table::Contracts, Order::asc("end_date"))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_inserted_vendors_sort_newest_first() {
        let backend = InMemoryBackend::new();
        backend.insert(Table::Vendors, json!({"name": "First"})).await.unwrap();
        backend.insert(Table::Vendors, json!({"name": "Second"})).await.unwrap();

        let rows = backend
            .select_all(Table::Vendors, Order::desc("created_at"))
            .await
            .unwrap();
        assert_eq!(rows[0]["name"], json!("Second"));
        assert_eq!(backend.calls(Operation::Insert), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_and_recovery() {
        let backend = InMemoryBackend::new();
        backend.fail(Operation::Update, Table::Vendors, "permission denied");
        let err = backend
            .update(Table::Vendors, json!({"x": 1}), &RowId::Int(1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "permission denied");

        backend.recover();
        assert!(backend
            .update(Table::Vendors, json!({"x": 1}), &RowId::Int(1))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = InMemoryBackend::new().with_user("buyer@example.com", "hunter22");
        assert!(backend.sign_in("buyer@example.com", "nope").await.is_err());
        let session = backend.sign_in("Buyer@Example.com", "hunter22").await.unwrap();
        assert_eq!(
            backend.current_session().await.map(|s| s.user.id),
            Some(session.user.id)
        );
    }
}
