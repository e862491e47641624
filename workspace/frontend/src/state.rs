//! Dashboard view state and the data fetcher that fills it.

use compute::{ContractAlert, DashboardSummary, VendorDirectory};
use model::{Contract, Vendor};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::api_client::contract::fetch_contracts;
use crate::api_client::vendor::fetch_vendors;
use crate::backend::{AuthService, StorageService};
use crate::clock::Clock;
use crate::forms::{ContractForm, VendorForm};
use crate::router::View;

/// The add-vendor / add-contract dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    AddVendor,
    AddContract,
}

/// Everything the signed-in dashboard shows, plus the backend handles
/// needed to reload and mutate it.
pub struct Dashboard {
    pub(crate) auth: Arc<dyn AuthService>,
    pub(crate) storage: Arc<dyn StorageService>,
    pub(crate) clock: Arc<dyn Clock>,

    pub vendors: Vec<Vendor>,
    pub contracts: Vec<Contract>,
    pub loading: bool,
    pub view: View,
    pub search_term: String,
    pub modal: Option<Modal>,
    pub vendor_draft: VendorForm,
    pub contract_draft: ContractForm,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("vendors", &self.vendors.len())
            .field("contracts", &self.contracts.len())
            .field("loading", &self.loading)
            .field("view", &self.view)
            .field("modal", &self.modal)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(auth: Arc<dyn AuthService>, storage: Arc<dyn StorageService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth,
            storage,
            clock,
            vendors: Vec::new(),
            contracts: Vec::new(),
            loading: false,
            view: View::default(),
            search_term: String::new(),
            modal: None,
            vendor_draft: VendorForm::default(),
            contract_draft: ContractForm::default(),
        }
    }

    /// Reloads both lists concurrently. A failed read only logs and leaves
    /// that list empty.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        self.loading = true;
        debug!("Loading vendors and contracts");

        let (vendors, contracts) = tokio::join!(
            fetch_vendors(self.storage.as_ref()),
            fetch_contracts(self.storage.as_ref())
        );

        self.vendors = vendors.unwrap_or_else(|e| {
            warn!("Vendor list unavailable, showing none: {}", e);
            Vec::new()
        });
        self.contracts = contracts.unwrap_or_else(|e| {
            warn!("Contract list unavailable, showing none: {}", e);
            Vec::new()
        });

        self.loading = false;
        info!(
            vendors = self.vendors.len(),
            contracts = self.contracts.len(),
            "Dashboard data loaded"
        );
    }

    pub fn set_view(&mut self, view: View) {
        debug!(from = %self.view, to = %view, "Switching view");
        self.view = view;
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    /// Closes the dialog; the draft is kept for the next time it opens.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Vendors whose name or category contains the search term,
    /// case-insensitively. An empty term matches everything.
    pub fn filtered_vendors(&self) -> Vec<&Vendor> {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return self.vendors.iter().collect();
        }
        self.vendors
            .iter()
            .filter(|vendor| {
                vendor.name.to_lowercase().contains(&term)
                    || vendor
                        .category
                        .as_ref()
                        .is_some_and(|c| c.label().to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn directory(&self) -> VendorDirectory<'_> {
        VendorDirectory::new(&self.vendors)
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::compute(&self.vendors, &self.contracts, self.clock.now())
    }

    /// Contracts in the 0..=30 day window, each with its days left.
    pub fn expiring(&self) -> Vec<(&Contract, i64)> {
        let now = self.clock.now();
        self.contracts
            .iter()
            .filter_map(|c| match compute::classify(c, now) {
                Some(ContractAlert::ExpiringSoon { days_left }) => Some((c, days_left)),
                _ => None,
            })
            .collect()
    }

    /// Contracts whose end date has passed, each with days since.
    pub fn expired(&self) -> Vec<(&Contract, i64)> {
        let now = self.clock.now();
        self.contracts
            .iter()
            .filter_map(|c| match compute::classify(c, now) {
                Some(ContractAlert::Expired { days_ago }) => Some((c, days_ago)),
                _ => None,
            })
            .collect()
    }

    pub fn alert_for(&self, contract: &Contract) -> Option<ContractAlert> {
        compute::classify(contract, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Table;
    use crate::clock::FixedClock;
    use crate::mock_backend::{InMemoryBackend, Operation};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn dashboard(backend: Arc<InMemoryBackend>) -> Dashboard {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap());
        Dashboard::new(backend.clone(), backend, Arc::new(clock))
    }

    fn seeded() -> Arc<InMemoryBackend> {
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

    #[tokio::test]
    async fn test_refresh_loads_ordered_lists() {
        let mut dashboard = dashboard(seeded());
        dashboard.refresh().await;

        assert!(!dashboard.loading);
        assert_eq!(dashboard.vendors[0].name, "Globex");
        let names: Vec<_> = dashboard.contracts.iter().map(|c| c.contract_name.as_str()).collect();
        assert_eq!(names, vec!["Freight", "Support", "Legacy"]);

        let summary = dashboard.summary();
        assert_eq!(summary.vendor_count, 2);
        assert_eq!(summary.contract_count, 3);
        assert_eq!(summary.total_spend, rust_decimal::Decimal::from(1000));
        assert_eq!(summary.expiring_count, 1);
        assert_eq!(summary.expired_count, 1);
    }

    #[tokio::test]
    async fn test_failed_read_becomes_empty_list() {
        let backend = seeded();
        backend.fail(Operation::Select, Table::Contracts, "timeout");

        let mut dashboard = dashboard(backend);
        dashboard.refresh().await;

        assert_eq!(dashboard.vendors.len(), 2);
        assert!(dashboard.contracts.is_empty());
    }

    #[tokio::test]
    async fn test_expiring_and_expired_partition() {
        let mut dashboard = dashboard(seeded());
        dashboard.refresh().await;

        let expiring = dashboard.expiring();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].0.contract_name, "Support");
        assert_eq!(expiring[0].1, 30);

        let expired = dashboard.expired();
        assert_eq!(expired[0].0.contract_name, "Freight");
        assert_eq!(expired[0].1, 17);

        let directory = dashboard.directory();
        assert_eq!(directory.name_of(dashboard.contracts[2].vendor_id.as_ref()), "Unknown Vendor");
    }

    #[tokio::test]
    async fn test_search_matches_name_and_category() {
        let mut dashboard = dashboard(seeded());
        dashboard.refresh().await;

        dashboard.set_search("acme");
        assert_eq!(dashboard.filtered_vendors().len(), 1);
        dashboard.set_search("LOGIST");
        assert_eq!(dashboard.filtered_vendors()[0].name, "Globex");
        dashboard.set_search("  ");
        assert_eq!(dashboard.filtered_vendors().len(), 2);
    }
}
