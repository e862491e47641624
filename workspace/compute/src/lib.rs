pub mod alerts;
pub mod directory;
pub mod metrics;

pub use alerts::{
    ContractAlert, EXPIRY_WINDOW_DAYS, classify, days_until, expired_contracts,
    expiring_contracts,
};
pub use directory::{UNKNOWN_VENDOR, VendorDirectory};
pub use metrics::{ComplianceBreakdown, DashboardSummary, compliance_breakdown, total_spend};
