use compute::{DashboardSummary, VendorDirectory};
use model::Contract;

pub const ALL_CLEAR_MESSAGE: &str = "All systems go! No contracts expiring soon.";
pub const ALERTS_HEADING: &str = "Action Required: Expiring Contracts";
pub const EXPIRED_HEADING: &str = "Expired Contracts";

/// KPI cards followed by the alert panel.
pub fn render(
    summary: &DashboardSummary,
    expiring: &[(&Contract, i64)],
    expired: &[(&Contract, i64)],
    directory: &VendorDirectory<'_>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("My Vendors: {}\n", summary.vendor_count));
    out.push_str(&format!("Contracts:  {}\n", summary.contract_count));
    out.push_str(&format!(
        "My Spend:   {}\n",
        common::format_compact_thousands(summary.total_spend)
    ));
    out.push_str(&format!("Alerts:     {}\n", summary.expiring_count));
    out.push_str(&format!(
        "Compliance: {} compliant, {} non compliant, {} pending\n",
        summary.compliance.compliant, summary.compliance.non_compliant, summary.compliance.pending
    ));
    out.push('\n');

    if expiring.is_empty() {
        out.push_str(ALL_CLEAR_MESSAGE);
        out.push('\n');
    } else {
        out.push_str(ALERTS_HEADING);
        out.push('\n');
        for (contract, days_left) in expiring {
            out.push_str(&format!(
                "  {} ({}) - Expires: {} ({})\n",
                contract.contract_name,
                directory.name_of(contract.vendor_id.as_ref()),
                contract.end_date.map(common::format_date).unwrap_or_default(),
                days_phrase(*days_left),
            ));
        }
    }

    if !expired.is_empty() {
        out.push('\n');
        out.push_str(EXPIRED_HEADING);
        out.push('\n');
        for (contract, days_ago) in expired {
            out.push_str(&format!(
                "  {} ({}) - Ended: {} ({} ago)\n",
                contract.contract_name,
                directory.name_of(contract.vendor_id.as_ref()),
                contract.end_date.map(common::format_date).unwrap_or_default(),
                plural_days(*days_ago),
            ));
        }
    }
    out
}

fn days_phrase(days_left: i64) -> String {
    match days_left {
        0 => "today".to_string(),
        n => format!("in {}", plural_days(n)),
    }
}

fn plural_days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}
