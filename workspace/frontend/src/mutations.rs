//! Form submissions and the report-issue action.

use model::{ComplianceStatus, RowId};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::api_client::contract::create_contract;
use crate::api_client::vendor::{create_vendor, mark_non_compliant};
use crate::backend::AuthService;
use crate::clock::Clock;
use crate::error::ClientError;
use crate::forms::FormError;
use crate::state::{Dashboard, Modal};

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Form(#[from] FormError),

    /// The backend rejected the write; shown with its raw message.
    #[error("Error: {0}")]
    Backend(#[from] ClientError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Vendor not found: {0}")]
    VendorNotFound(RowId),
}

/// What the report-issue action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No reason given; nothing changed.
    Skipped,
    Reported,
}

impl Dashboard {
    async fn user_id(&self) -> Result<Uuid, MutationError> {
        self.auth
            .current_session()
            .await
            .map(|session| session.user_id())
            .ok_or(MutationError::NotSignedIn)
    }

    /// Submits the add-vendor draft. On success the lists are reloaded, the
    /// dialog closes and the draft resets; on failure both stay as they were.
    #[instrument(skip(self))]
    pub async fn submit_vendor(&mut self) -> Result<(), MutationError> {
        let user_id = self.user_id().await?;
        let payload = self.vendor_draft.to_new_vendor(user_id)?;

        create_vendor(self.storage.as_ref(), &payload).await?;

        self.refresh().await;
        if self.modal == Some(Modal::AddVendor) {
            self.modal = None;
        }
        self.vendor_draft = Default::default();
        Ok(())
    }

    /// Submits the add-contract draft. The vendor must be one of the loaded
    /// vendors.
    #[instrument(skip(self))]
    pub async fn submit_contract(&mut self) -> Result<(), MutationError> {
        let user_id = self.user_id().await?;
        let payload = self
            .contract_draft
            .to_new_contract(user_id, self.clock.today())?;
        if !self.directory().contains(&payload.vendor_id) {
            return Err(FormError::UnknownVendor(payload.vendor_id).into());
        }

        create_contract(self.storage.as_ref(), &payload).await?;

        self.refresh().await;
        if self.modal == Some(Modal::AddContract) {
            self.modal = None;
        }
        self.contract_draft = Default::default();
        Ok(())
    }

    /// Flags a vendor `non_compliant`. A missing or empty reason cancels
    /// the action; any other text, whitespace included, goes ahead. The local list changes first and is rolled back if the
    /// backend rejects the update. The reason is only logged.
    #[instrument(skip(self, reason))]
    pub async fn report_issue(&mut self, id: &RowId, reason: Option<&str>) -> Result<ReportOutcome, MutationError> {
        let Some(reason) = reason.filter(|r| !r.is_empty()) else {
            debug!(vendor_id = %id, "Report cancelled, no reason given");
            return Ok(ReportOutcome::Skipped);
        };

        let vendor = self
            .vendors
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| MutationError::VendorNotFound(id.clone()))?;
        let previous = vendor.compliance_status;
        vendor.compliance_status = Some(ComplianceStatus::NonCompliant);
        info!(vendor_id = %id, reason, "Compliance issue reported");

        if let Err(e) = mark_non_compliant(self.storage.as_ref(), id).await {
            warn!(vendor_id = %id, "Reverting compliance status: {}", e);
            if let Some(vendor) = self.vendors.iter_mut().find(|v| &v.id == id) {
                vendor.compliance_status = previous;
            }
            return Err(e.into());
        }

        Ok(ReportOutcome::Reported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AuthService, Table};
    use crate::clock::FixedClock;
    use crate::mock_backend::{InMemoryBackend, Operation};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    async fn signed_in() -> (Arc<InMemoryBackend>, Dashboard) {
        let backend = Arc::new(InMemoryBackend::new().with_user("buyer@example.com", "hunter22"));
        backend.sign_in("buyer@example.com", "hunter22").await.unwrap();
        backend.seed(
            Table::Vendors,
            vec![json!({"id": 1, "name": "Acme Corp", "compliance_status": "compliant"})],
        );
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap());
        let mut dashboard = Dashboard::new(backend.clone(), backend.clone(), Arc::new(clock));
        dashboard.refresh().await;
        (backend, dashboard)
    }

    #[tokio::test]
    async fn test_submit_vendor_persists_coerced_spend() {
        let (backend, mut dashboard) = signed_in().await;
        dashboard.open_modal(Modal::AddVendor);
        dashboard.vendor_draft.name = "Initech".to_string();
        dashboard.vendor_draft.total_spend = "1500.50".to_string();

        dashboard.submit_vendor().await.unwrap();

        let rows = backend.rows(Table::Vendors);
        let stored = rows.iter().find(|r| r["name"] == json!("Initech")).unwrap();
        assert_eq!(stored["total_spend"], json!(1500.5));
        assert_eq!(stored["compliance_status"], json!("compliant"));
        assert_eq!(stored["category"], json!("IT Services"));
        assert!(stored["user_id"].is_string());

        assert_eq!(dashboard.vendors.len(), 2);
        assert_eq!(dashboard.modal, None);
        assert_eq!(dashboard.vendor_draft, crate::forms::VendorForm::default());
    }

    #[tokio::test]
    async fn test_garbage_spend_persists_zero() {
        let (backend, mut dashboard) = signed_in().await;
        dashboard.vendor_draft.name = "Hooli".to_string();
        dashboard.vendor_draft.total_spend = "abc".to_string();

        dashboard.submit_vendor().await.unwrap();

        let rows = backend.rows(Table::Vendors);
        let stored = rows.iter().find(|r| r["name"] == json!("Hooli")).unwrap();
        assert_eq!(stored["total_spend"], json!(0.0));
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_modal_and_draft() {
        let (backend, mut dashboard) = signed_in().await;
        backend.fail(Operation::Insert, Table::Vendors, "duplicate key value");
        dashboard.open_modal(Modal::AddVendor);
        dashboard.vendor_draft.name = "Initech".to_string();
        dashboard.vendor_draft.total_spend = "10".to_string();

        let err = dashboard.submit_vendor().await.unwrap_err();
        assert_eq!(err.to_string(), "Error: duplicate key value");
        assert_eq!(dashboard.modal, Some(Modal::AddVendor));
        assert_eq!(dashboard.vendor_draft.name, "Initech");
        assert_eq!(dashboard.vendors.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_contract_stamps_today_and_active() {
        let (backend, mut dashboard) = signed_in().await;
        dashboard.open_modal(Modal::AddContract);
        dashboard.contract_draft.contract_name = "Support".to_string();
        dashboard.contract_draft.vendor_id = Some(RowId::Int(1));
        dashboard.contract_draft.end_date = "2026-11-01".to_string();
        dashboard.contract_draft.value = "2500".to_string();

        dashboard.submit_contract().await.unwrap();

        let rows = backend.rows(Table::Contracts);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["start_date"], json!("2026-10-18"));
        assert_eq!(rows[0]["status"], json!("active"));
        assert_eq!(rows[0]["vendor_id"], json!(1));

        assert_eq!(dashboard.contracts.len(), 1);
        assert_eq!(dashboard.contracts[0].start_date, NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(dashboard.contracts[0].value, Some(Decimal::from(2500)));
        assert_eq!(dashboard.modal, None);
    }

    #[tokio::test]
    async fn test_contract_vendor_must_be_loaded() {
        let (backend, mut dashboard) = signed_in().await;
        dashboard.contract_draft.contract_name = "Support".to_string();
        dashboard.contract_draft.vendor_id = Some(RowId::Int(42));
        dashboard.contract_draft.end_date = "2026-11-01".to_string();
        dashboard.contract_draft.value = "1".to_string();

        let err = dashboard.submit_contract().await.unwrap_err();
        assert!(matches!(err, MutationError::Form(FormError::UnknownVendor(RowId::Int(42)))));
        assert_eq!(backend.calls(Operation::Insert), 0);
    }

    #[tokio::test]
    async fn test_mutations_require_session() {
        let (backend, mut dashboard) = signed_in().await;
        backend.sign_out().await.unwrap();
        dashboard.vendor_draft.name = "Initech".to_string();
        dashboard.vendor_draft.total_spend = "1".to_string();

        assert!(matches!(
            dashboard.submit_vendor().await,
            Err(MutationError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_report_without_reason_is_noop() {
        let (backend, mut dashboard) = signed_in().await;

        for reason in [None, Some("")] {
            let outcome = dashboard.report_issue(&RowId::Int(1), reason).await.unwrap();
            assert_eq!(outcome, ReportOutcome::Skipped);
        }
        assert!(dashboard.vendors[0].is_compliant());
        assert_eq!(backend.calls(Operation::Update), 0);
    }

    #[tokio::test]
    async fn test_report_with_whitespace_reason_goes_ahead() {
        let (backend, mut dashboard) = signed_in().await;

        let outcome = dashboard.report_issue(&RowId::Int(1), Some("   ")).await.unwrap();

        assert_eq!(outcome, ReportOutcome::Reported);
        assert!(!dashboard.vendors[0].is_compliant());
        assert_eq!(backend.calls(Operation::Update), 1);
    }

    #[tokio::test]
    async fn test_report_sets_non_compliant_locally_and_remotely() {
        let (backend, mut dashboard) = signed_in().await;

        let outcome = dashboard
            .report_issue(&RowId::Int(1), Some("late delivery"))
            .await
            .unwrap();

        assert_eq!(outcome, ReportOutcome::Reported);
        assert_eq!(
            dashboard.vendors[0].compliance_status,
            Some(ComplianceStatus::NonCompliant)
        );
        assert_eq!(
            backend.rows(Table::Vendors)[0]["compliance_status"],
            json!("non_compliant")
        );
    }

    #[tokio::test]
    async fn test_failed_report_rolls_back() {
        let (backend, mut dashboard) = signed_in().await;
        backend.fail(Operation::Update, Table::Vendors, "permission denied");

        let err = dashboard
            .report_issue(&RowId::Int(1), Some("late delivery"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error: permission denied");
        assert_eq!(
            dashboard.vendors[0].compliance_status,
            Some(ComplianceStatus::Compliant)
        );
        assert_eq!(
            backend.rows(Table::Vendors)[0]["compliance_status"],
            json!("compliant")
        );
    }

    #[tokio::test]
    async fn test_report_unknown_vendor() {
        let (_backend, mut dashboard) = signed_in().await;
        let err = dashboard
            .report_issue(&RowId::Int(404), Some("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::VendorNotFound(RowId::Int(404))));
    }
}
