use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{wire, RowId};

/// Vendor category offered by the add-vendor form.
///
/// Rows written by other clients may carry labels outside the fixed set;
/// those are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VendorCategory {
    #[default]
    ItServices,
    Logistics,
    Hardware,
    Consulting,
    Other(String),
}

impl VendorCategory {
    /// The categories the add-vendor form offers, in display order.
    pub const CHOICES: [VendorCategory; 4] = [
        VendorCategory::ItServices,
        VendorCategory::Logistics,
        VendorCategory::Hardware,
        VendorCategory::Consulting,
    ];

    pub fn label(&self) -> &str {
        match self {
            VendorCategory::ItServices => "IT Services",
            VendorCategory::Logistics => "Logistics",
            VendorCategory::Hardware => "Hardware",
            VendorCategory::Consulting => "Consulting",
            VendorCategory::Other(label) => label,
        }
    }

    /// Maps a stored label back onto the fixed set, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        Self::CHOICES
            .iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| VendorCategory::Other(trimmed.to_string()))
    }
}

impl fmt::Display for VendorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for VendorCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for VendorCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(VendorCategory::from_label(&label))
    }
}

/// Compliance flag on a vendor. An unset column means "pending" and is
/// represented as `None` on [`Vendor::compliance_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NonCompliant => "non_compliant",
        }
    }
}

impl FromStr for ComplianceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "compliant" => Ok(ComplianceStatus::Compliant),
            "non_compliant" => Ok(ComplianceStatus::NonCompliant),
            other => Err(format!("Unknown compliance status: {}", other)),
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplier row from the `vendors` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: RowId,
    /// Owner stamped on insert. Read scoping is the backend's row policy.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "wire::category")]
    pub category: Option<VendorCategory>,
    /// Annual spend. `None` when the column is empty or not a number.
    #[serde(
        default,
        deserialize_with = "wire::amount",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub total_spend: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::compliance")]
    pub compliance_status: Option<ComplianceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Vendor {
    /// Spend with missing or non-numeric values counted as zero.
    pub fn spend_or_zero(&self) -> Decimal {
        self.total_spend.unwrap_or(Decimal::ZERO)
    }

    pub fn is_compliant(&self) -> bool {
        self.compliance_status == Some(ComplianceStatus::Compliant)
    }
}

/// Insert payload for the `vendors` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVendor {
    pub user_id: Uuid,
    pub name: String,
    pub category: VendorCategory,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_spend: Decimal,
    pub compliance_status: ComplianceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Update payload used by the report-issue action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompliancePatch {
    pub compliance_status: ComplianceStatus,
}

impl CompliancePatch {
    pub fn non_compliant() -> Self {
        Self {
            compliance_status: ComplianceStatus::NonCompliant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_vendor_decodes_full_row() {
        let row = json!({
            "id": 12,
            "user_id": "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11",
            "name": "Acme Corp",
            "category": "Logistics",
            "total_spend": 12500.75,
            "compliance_status": "non_compliant",
            "contact": "ops@acme.test",
            "created_at": "2026-01-05T09:15:00.123456+00:00"
        });

        let vendor: Vendor = serde_json::from_value(row).unwrap();
        assert_eq!(vendor.id, RowId::Int(12));
        assert_eq!(vendor.name, "Acme Corp");
        assert_eq!(vendor.category, Some(VendorCategory::Logistics));
        assert_eq!(vendor.total_spend, Some(Decimal::from_str("12500.75").unwrap()));
        assert_eq!(vendor.compliance_status, Some(ComplianceStatus::NonCompliant));
        assert!(vendor.created_at.is_some());
    }

    #[test]
    fn test_vendor_row_only_rejected_on_id_or_owner() {
        let nameless: Vendor = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(nameless.name, "");

        assert!(serde_json::from_value::<Vendor>(json!({"name": "No Id"})).is_err());
        assert!(serde_json::from_value::<Vendor>(json!({"id": {"x": 1}, "name": "Odd"})).is_err());
        assert!(serde_json::from_value::<Vendor>(json!({"id": 4, "user_id": "not-a-uuid"})).is_err());
    }

    #[test]
    fn test_vendor_decodes_sparse_and_garbage_fields() {
        let row = json!({
            "id": "v-1",
            "name": "Loose Row",
            "category": "Catering",
            "total_spend": "bad",
            "compliance_status": "under_review",
            "created_at": null
        });

        let vendor: Vendor = serde_json::from_value(row).unwrap();
        assert_eq!(vendor.category, Some(VendorCategory::Other("Catering".to_string())));
        assert_eq!(vendor.total_spend, None);
        assert_eq!(vendor.spend_or_zero(), Decimal::ZERO);
        assert_eq!(vendor.compliance_status, None);
        assert_eq!(vendor.user_id, None);
        assert_eq!(vendor.created_at, None);
    }

    #[test]
    fn test_numeric_string_spend_is_accepted() {
        let vendor: Vendor =
            serde_json::from_value(json!({"id": 1, "name": "A", "total_spend": "1000.50"})).unwrap();
        assert_eq!(vendor.total_spend, Some(Decimal::from_str("1000.50").unwrap()));
    }

    #[test]
    fn test_new_vendor_serializes_spend_as_number() {
        let payload = NewVendor {
            user_id: Uuid::nil(),
            name: "Acme Corp".to_string(),
            category: VendorCategory::ItServices,
            total_spend: Decimal::from_str("1500.50").unwrap(),
            compliance_status: ComplianceStatus::Compliant,
            contact: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["total_spend"], json!(1500.5));
        assert_eq!(value["category"], json!("IT Services"));
        assert_eq!(value["compliance_status"], json!("compliant"));
        assert!(value.get("contact").is_none());
    }

    #[test]
    fn test_category_labels_round_trip_case_insensitively() {
        for choice in VendorCategory::CHOICES {
            assert_eq!(VendorCategory::from_label(&choice.label().to_lowercase()), choice);
            assert!(!matches!(choice, VendorCategory::Other(_)));
        }
    }

    #[test]
    fn test_compliance_patch_body() {
        let value = serde_json::to_value(CompliancePatch::non_compliant()).unwrap();
        assert_eq!(value, json!({"compliance_status": "non_compliant"}));
    }
}
