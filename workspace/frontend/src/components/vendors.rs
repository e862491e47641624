use model::{ComplianceStatus, Vendor};

use super::table::TextTable;

pub const EMPTY_MESSAGE: &str = "No vendors found. Add one to get started.";

/// Compliance badge text; an unset status reads as pending.
pub fn status_label(status: Option<ComplianceStatus>) -> &'static str {
    match status {
        Some(ComplianceStatus::Compliant) => "compliant",
        Some(ComplianceStatus::NonCompliant) => "non compliant",
        None => "Pending",
    }
}

/// The "My Vendors" table.
pub fn render(vendors: &[&Vendor]) -> String {
    let mut out = String::from("My Vendors\n\n");
    if vendors.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
        return out;
    }

    let mut table = TextTable::new(["ID", "Vendor Name", "Category", "Annual Spend", "Status"]);
    for vendor in vendors {
        table.row([
            vendor.id.to_string(),
            vendor.name.clone(),
            vendor
                .category
                .as_ref()
                .map(|c| c.label().to_string())
                .unwrap_or_default(),
            common::format_money(vendor.spend_or_zero()),
            status_label(vendor.compliance_status).to_string(),
        ]);
    }
    out.push_str(&table.render());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(Some(ComplianceStatus::Compliant)), "compliant");
        assert_eq!(status_label(Some(ComplianceStatus::NonCompliant)), "non compliant");
        assert_eq!(status_label(None), "Pending");
    }

    #[test]
    fn test_render_rows_and_empty_state() {
        assert!(render(&[]).contains(EMPTY_MESSAGE));

        let vendor: Vendor = serde_json::from_value(json!({
            "id": 7, "name": "Acme Corp", "category": "Hardware",
            "total_spend": 48000, "compliance_status": "non_compliant"
        }))
        .unwrap();
        let text = render(&[&vendor]);
        assert!(text.contains("Acme Corp"));
        assert!(text.contains("$48,000.00"));
        assert!(text.contains("non compliant"));
        assert!(!text.contains(EMPTY_MESSAGE));
    }
}
