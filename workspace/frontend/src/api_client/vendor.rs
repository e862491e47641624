use model::{CompliancePatch, NewVendor, RowId, Vendor};
use tracing::{debug, error, info, trace};

use super::decode_rows;
use crate::backend::{Order, StorageService, Table};
use crate::error::ClientError;

/// Newest vendors first.
pub const VENDOR_ORDER: Order = Order::desc("created_at");

/// Get all vendors visible to the current user
pub async fn fetch_vendors(storage: &dyn StorageService) -> Result<Vec<Vendor>, ClientError> {
    trace!("Fetching all vendors");
    let result = storage.select_all(Table::Vendors, VENDOR_ORDER).await;
    match result {
        Ok(rows) => {
            let vendors: Vec<Vendor> = decode_rows(Table::Vendors.name(), rows);
            info!("Fetched {} vendors", vendors.len());
            Ok(vendors)
        }
        Err(e) => {
            error!("Failed to fetch vendors: {}", e);
            Err(e)
        }
    }
}

/// Insert one vendor row
pub async fn create_vendor(storage: &dyn StorageService, vendor: &NewVendor) -> Result<(), ClientError> {
    debug!("Creating new vendor: {}", vendor.name);
    let row = serde_json::to_value(vendor)?;
    let result = storage.insert(Table::Vendors, row).await;
    match &result {
        Ok(()) => info!("Successfully created vendor: {}", vendor.name),
        Err(e) => error!("Failed to create vendor '{}': {}", vendor.name, e),
    }
    result
}

/// Flag a vendor as `non_compliant`
pub async fn mark_non_compliant(storage: &dyn StorageService, id: &RowId) -> Result<(), ClientError> {
    debug!("Marking vendor {} non-compliant", id);
    let patch = serde_json::to_value(CompliancePatch::non_compliant())?;
    let result = storage.update(Table::Vendors, patch, id).await;
    match &result {
        Ok(()) => info!("Vendor {} marked non-compliant", id),
        Err(e) => error!("Failed to update compliance of vendor {}: {}", id, e),
    }
    result
}
