use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{wire, RowId};

/// Contract lifecycle status. Only `active` is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(ContractStatus::Active),
            other => Err(format!("Unknown contract status: {}", other)),
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Active => f.write_str("active"),
        }
    }
}

/// A time-bounded agreement from the `contracts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: RowId,
    /// Reference into `vendors`; not enforced by the client.
    #[serde(default)]
    pub vendor_id: Option<RowId>,
    #[serde(default)]
    pub contract_name: String,
    #[serde(default, deserialize_with = "wire::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::date")]
    pub end_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "wire::amount",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub value: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::contract_status")]
    pub status: Option<ContractStatus>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Insert payload for the `contracts` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContract {
    pub vendor_id: RowId,
    pub contract_name: String,
    pub end_date: NaiveDate,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub value: Decimal,
    pub start_date: NaiveDate,
    pub status: ContractStatus,
    pub user_id: Uuid,
}
