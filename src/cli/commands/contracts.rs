use anyhow::Result;
use frontend::components::render_view;
use frontend::{ContractForm, View};
use model::RowId;
use serde_json::json;

use super::Context;
use crate::output::{render, success};

/// All contracts, soonest end date first, with expiry flags.
pub async fn list(ctx: &Context) -> Result<String> {
    let mut dashboard = ctx.load_dashboard().await?;
    dashboard.set_view(View::Contracts);
    let email = ctx.signed_in_email().await;

    let directory = dashboard.directory();
    let rows: Vec<_> = dashboard
        .contracts
        .iter()
        .map(|contract| {
            json!({
                "contract": contract,
                "vendor": directory.name_of(contract.vendor_id.as_ref()),
                "alert": dashboard.alert_for(contract),
            })
        })
        .collect();

    render(&rows, ctx.output, || render_view(&dashboard, email.as_deref()))
}

/// Adds a contract for one of the signed-in user's vendors, starting today.
pub async fn add(ctx: &Context, name: &str, vendor: &str, end_date: &str, value: &str) -> Result<String> {
    let mut dashboard = ctx.load_dashboard().await?;
    let vendor = vendor.trim();
    dashboard.contract_draft = ContractForm {
        contract_name: name.to_string(),
        vendor_id: (!vendor.is_empty()).then(|| RowId::parse(vendor)),
        end_date: end_date.to_string(),
        value: value.to_string(),
    };
    dashboard.submit_contract().await?;

    render(
        &json!({ "created": name.trim(), "contracts": dashboard.contracts }),
        ctx.output,
        || success(&format!("Contract added: {}", name.trim())),
    )
}
