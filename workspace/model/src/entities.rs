//! Row types for the two tables the dashboard works with.
//!
//! Rows are owned by the hosted backend; these structs only mirror what the
//! REST layer returns and what the insert/update calls send. Decoding is
//! deliberately lenient (see [`wire`]) because nothing on the backend side
//! constrains the numeric or enum-like columns.

pub mod contract;
pub mod vendor;
mod wire;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Primary key of a backend row.
///
/// Tables may use integer identity columns or uuid/text keys, so the id keeps
/// whichever JSON representation the backend produced and writes it back the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    /// Parses user input (e.g. a CLI argument) into an id, preferring the
    /// integer form when the text is all digits.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(id) => RowId::Int(id),
            Err(_) => RowId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(id) => write!(f, "{}", id),
            RowId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        RowId::Int(id)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        RowId::Text(id.to_string())
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowId::Int(id) => serializer.serialize_i64(*id),
            RowId::Text(id) => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(id) => RowId::Int(id),
            Raw::Text(id) => RowId::Text(id),
        })
    }
}
