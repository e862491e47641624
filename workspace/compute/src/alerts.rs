//! Contract expiry alerts.
//!
//! A contract's end date is taken as midnight UTC of that day. The number of
//! days left is the ceiling of the remaining time in whole days, so a
//! contract ending tomorrow at midnight is "1 day left" for the whole of
//! today.

use chrono::{DateTime, NaiveDate, Utc};
use model::Contract;
use serde::Serialize;
use tracing::{debug, instrument};

/// Contracts with at most this many days left raise an alert.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Where a contract stands relative to the alert window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractAlert {
    /// Ends within the window; `days_left` is in `0..=EXPIRY_WINDOW_DAYS`.
    ExpiringSoon { days_left: i64 },
    /// End date already passed.
    Expired { days_ago: i64 },
}

/// `ceil((end_date - now) / 1 day)` with `end_date` at midnight UTC.
pub fn days_until(end_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let end = end_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let remaining_ms = (end - now).num_milliseconds();
    -((-remaining_ms).div_euclid(MILLIS_PER_DAY))
}

/// Classifies one contract on its days left. `None` means no alert: the
/// end date is further out than the window, or missing.
///
/// A contract ending today stays in the window for the whole day
/// (`days_left` rounds up to 0); it only counts as expired from the next day.
pub fn classify(contract: &Contract, now: DateTime<Utc>) -> Option<ContractAlert> {
    let days_left = days_until(contract.end_date?, now);
    if days_left < 0 {
        return Some(ContractAlert::Expired {
            days_ago: -days_left,
        });
    }

    (days_left <= EXPIRY_WINDOW_DAYS).then_some(ContractAlert::ExpiringSoon { days_left })
}

/// Contracts ending within the next [`EXPIRY_WINDOW_DAYS`] days, in input
/// order. Lapsed contracts are not part of this set.
#[instrument(skip(contracts), fields(num_contracts = contracts.len()))]
pub fn expiring_contracts(contracts: &[Contract], now: DateTime<Utc>) -> Vec<&Contract> {
    let expiring: Vec<&Contract> = contracts
        .iter()
        .filter(|c| matches!(classify(c, now), Some(ContractAlert::ExpiringSoon { .. })))
        .collect();
    debug!("{} of {} contracts expiring soon", expiring.len(), contracts.len());
    expiring
}

/// Contracts with a negative day count, in input order.
#[instrument(skip(contracts), fields(num_contracts = contracts.len()))]
pub fn expired_contracts(contracts: &[Contract], now: DateTime<Utc>) -> Vec<&Contract> {
    contracts
        .iter()
        .filter(|c| matches!(classify(c, now), Some(ContractAlert::Expired { .. })))
        .collect()
}
