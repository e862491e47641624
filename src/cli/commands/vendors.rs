use anyhow::Result;
use frontend::components::render_view;
use frontend::{ReportOutcome, VendorForm, View};
use model::{RowId, VendorCategory};
use serde_json::json;

use super::Context;
use crate::output::{render, success};

/// The vendor table, newest first, optionally filtered.
pub async fn list(ctx: &Context, search: Option<&str>) -> Result<String> {
    let mut dashboard = ctx.load_dashboard().await?;
    dashboard.set_view(View::Vendors);
    if let Some(term) = search {
        dashboard.set_search(term);
    }
    let email = ctx.signed_in_email().await;

    render(&dashboard.filtered_vendors(), ctx.output, || {
        render_view(&dashboard, email.as_deref())
    })
}

pub async fn add(
    ctx: &Context,
    name: &str,
    category: &str,
    spend: &str,
    contact: Option<&str>,
) -> Result<String> {
    let mut dashboard = ctx.load_dashboard().await?;
    dashboard.vendor_draft = VendorForm {
        name: name.to_string(),
        category: VendorCategory::from_label(category),
        total_spend: spend.to_string(),
        contact: contact.unwrap_or_default().to_string(),
    };
    dashboard.submit_vendor().await?;

    render(
        &json!({ "created": name.trim(), "vendors": dashboard.vendors }),
        ctx.output,
        || success(&format!("Vendor added: {}", name.trim())),
    )
}

/// Marks a vendor non-compliant. Without a reason nothing changes.
pub async fn report(ctx: &Context, id: &str, reason: Option<&str>) -> Result<String> {
    let mut dashboard = ctx.load_dashboard().await?;
    let id = RowId::parse(id);
    let outcome = dashboard.report_issue(&id, reason).await?;

    let vendor = dashboard.vendors.iter().find(|v| v.id == id);
    render(
        &json!({ "reported": outcome == ReportOutcome::Reported, "vendor": vendor }),
        ctx.output,
        || match outcome {
            ReportOutcome::Skipped => format!("No reason given, vendor {} left unchanged", id),
            ReportOutcome::Reported => success(&format!(
                "Issue reported. {} is now marked non compliant",
                vendor.map(|v| v.name.as_str()).unwrap_or("Vendor")
            )),
        },
    )
}
