use model::{Contract, NewContract};
use tracing::{debug, error, info, trace};

use super::decode_rows;
use crate::backend::{Order, StorageService, Table};
use crate::error::ClientError;

/// Soonest end date first.
pub const CONTRACT_ORDER: Order = Order::asc("end_date");

/// Get all contracts visible to the current user
pub async fn fetch_contracts(storage: &dyn StorageService) -> Result<Vec<Contract>, ClientError> {
    trace!("Fetching all contracts");
    let result = storage.select_all(Table::Contracts, CONTRACT_ORDER).await;
    match result {
        Ok(rows) => {
            let contracts: Vec<Contract> = decode_rows(Table::Contracts.name(), rows);
            info!("Fetched {} contracts", contracts.len());
            Ok(contracts)
        }
        Err(e) => {
            error!("Failed to fetch contracts: {}", e);
            Err(e)
        }
    }
}

/// Insert one contract row
pub async fn create_contract(storage: &dyn StorageService, contract: &NewContract) -> Result<(), ClientError> {
    debug!("Creating new contract: {}", contract.contract_name);
    let row = serde_json::to_value(contract)?;
    let result = storage.insert(Table::Contracts, row).await;
    match &result {
        Ok(()) => info!(
            "Successfully created contract: {} (vendor {})",
            contract.contract_name, contract.vendor_id
        ),
        Err(e) => error!("Failed to create contract '{}': {}", contract.contract_name, e),
    }
    result
}
