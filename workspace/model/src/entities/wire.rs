//! Lenient field decoders used by the row types.
//!
//! Every decoder here maps "absent", `null` and unparseable values to `None`
//! instead of failing the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::contract::ContractStatus;
use super::vendor::{ComplianceStatus, VendorCategory};

fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.filter(|value| !value.is_null()))
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(raw(deserializer)?.and_then(|value| match value {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = raw(deserializer)?;
    let amount = value.as_ref().and_then(common::amount_from_json);
    if amount.is_none() {
        if let Some(value) = value {
            debug!(%value, "Ignoring non-numeric amount");
        }
    }
    Ok(amount)
}

pub(crate) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.and_then(|s| parse_date(&s)))
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.and_then(|s| parse_timestamp(&s)))
}

pub(crate) fn category<'de, D>(deserializer: D) -> Result<Option<VendorCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .map(|s| VendorCategory::from_label(&s)))
}

pub(crate) fn compliance<'de, D>(deserializer: D) -> Result<Option<ComplianceStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.and_then(|s| s.parse().ok()))
}

pub(crate) fn contract_status<'de, D>(deserializer: D) -> Result<Option<ContractStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.and_then(|s| s.parse().ok()))
}

/// Accepts a plain `YYYY-MM-DD` date or a full timestamp (taken in UTC).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(input).map(|ts| ts.date_naive()))
}

/// RFC 3339 first, then a zone-less Postgres `timestamp` rendering.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
}
