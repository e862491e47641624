//! Dashboard figures derived from the loaded vendor and contract lists.

use chrono::{DateTime, Utc};
use model::{ComplianceStatus, Contract, Vendor};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::alerts::{expired_contracts, expiring_contracts};

/// Sum of vendor spend, counting missing or non-numeric values as zero.
pub fn total_spend(vendors: &[Vendor]) -> Decimal {
    vendors.iter().map(Vendor::spend_or_zero).sum()
}

/// Sum of contract values, counting missing values as zero.
pub fn total_contract_value(contracts: &[Contract]) -> Decimal {
    contracts
        .iter()
        .map(|c| c.value.unwrap_or(Decimal::ZERO))
        .sum()
}

/// Vendor counts per compliance flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceBreakdown {
    pub compliant: usize,
    pub non_compliant: usize,
    pub pending: usize,
}

pub fn compliance_breakdown(vendors: &[Vendor]) -> ComplianceBreakdown {
    vendors
        .iter()
        .fold(ComplianceBreakdown::default(), |mut acc, vendor| {
            match vendor.compliance_status {
                Some(ComplianceStatus::Compliant) => acc.compliant += 1,
                Some(ComplianceStatus::NonCompliant) => acc.non_compliant += 1,
                None => acc.pending += 1,
            }
            acc
        })
}

/// The KPI row at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub vendor_count: usize,
    pub contract_count: usize,
    pub total_spend: Decimal,
    pub total_contract_value: Decimal,
    pub expiring_count: usize,
    pub expired_count: usize,
    pub compliance: ComplianceBreakdown,
}

impl DashboardSummary {
    #[instrument(skip(vendors, contracts), fields(num_vendors = vendors.len(), num_contracts = contracts.len()))]
    pub fn compute(vendors: &[Vendor], contracts: &[Contract], now: DateTime<Utc>) -> Self {
        Self {
            vendor_count: vendors.len(),
            contract_count: contracts.len(),
            total_spend: total_spend(vendors),
            total_contract_value: total_contract_value(contracts),
            expiring_count: expiring_contracts(contracts, now).len(),
            expired_count: expired_contracts(contracts, now).len(),
            compliance: compliance_breakdown(vendors),
        }
    }
}
