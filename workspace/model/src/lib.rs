pub mod auth;
pub mod entities;

pub use auth::{AuthUser, Session};
pub use entities::contract::{Contract, ContractStatus, NewContract};
pub use entities::vendor::{ComplianceStatus, CompliancePatch, NewVendor, Vendor, VendorCategory};
pub use entities::RowId;

// Re-export tracing for use in this crate
pub use tracing;
