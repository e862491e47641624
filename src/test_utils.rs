use chrono::{TimeZone, Utc};
use frontend::FixedClock;
use frontend::mock_backend::InMemoryBackend;
use frontend::{AuthService, Table};
use serde_json::json;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::commands::Context;
use crate::output::OutputFormat;

pub const EMAIL: &str = "buyer@example.com";
pub const PASSWORD: &str = "hunter22";

/// Initialize tracing for tests with output to STDERR.
///
/// The log level comes from RUST_LOG, defaulting to WARN.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| match level.to_uppercase().as_str() {
            "ERROR" => Some(Level::ERROR),
            "WARN" => Some(Level::WARN),
            "INFO" => Some(Level::INFO),
            "DEBUG" => Some(Level::DEBUG),
            "TRACE" => Some(Level::TRACE),
            _ => None,
        })
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// 2026-10-18 12:00 UTC
pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
    ))
}

/// A table-output context over the given backend. Nobody is signed in.
pub fn context(backend: Arc<InMemoryBackend>) -> Context {
    Context::new(backend.clone(), backend, test_clock(), OutputFormat::Table)
}

/// Registers [`EMAIL`] and signs in before handing out the context.
pub async fn signed_in_context(backend: Arc<InMemoryBackend>) -> (Arc<InMemoryBackend>, Context) {
    backend
        .sign_up(EMAIL, PASSWORD)
        .await
        .expect("Failed to register test user");
    backend
        .sign_in(EMAIL, PASSWORD)
        .await
        .expect("Failed to sign in test user");
    let ctx = context(backend.clone());
    (backend, ctx)
}

/// Two vendors and three contracts relative to [`test_clock`]:
/// `Support` expires in 30 days, `Freight` ended 17 days ago and `Legacy`
/// belongs to a vendor that is not loaded.
pub fn seeded_backend() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed(
        Table::Vendors,
        vec![
            json!({"id": 1, "name": "Acme Corp", "category": "Hardware", "total_spend": 1000,
                   "compliance_status": "compliant", "created_at": "2026-01-01T00:00:00Z"}),
            json!({"id": 2, "name": "Globex", "category": "Logistics", "total_spend": "bad",
                   "created_at": "2026-02-01T00:00:00Z"}),
        ],
    );
    backend.seed(
        Table::Contracts,
        vec![
            json!({"id": 10, "vendor_id": 1, "contract_name": "Support", "end_date": "2026-11-17", "value": 500}),
            json!({"id": 11, "vendor_id": 2, "contract_name": "Freight", "end_date": "2026-10-01", "value": 800}),
            json!({"id": 12, "vendor_id": 99, "contract_name": "Legacy", "end_date": "2027-06-30"}),
        ],
    );
    backend
}
