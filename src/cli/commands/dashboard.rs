use anyhow::Result;
use frontend::View;
use frontend::components::render_view;
use serde_json::json;

use super::Context;
use crate::output::render;

/// KPI cards and the expiry alert panel.
pub async fn show(ctx: &Context) -> Result<String> {
    let mut dashboard = ctx.load_dashboard().await?;
    dashboard.set_view(View::Dashboard);
    let email = ctx.signed_in_email().await;

    let expiring: Vec<_> = dashboard
        .expiring()
        .into_iter()
        .map(|(contract, days_left)| json!({ "contract": contract, "days_left": days_left }))
        .collect();
    let expired: Vec<_> = dashboard
        .expired()
        .into_iter()
        .map(|(contract, days_ago)| json!({ "contract": contract, "days_ago": days_ago }))
        .collect();

    render(
        &json!({
            "summary": dashboard.summary(),
            "expiring": expiring,
            "expired": expired,
        }),
        ctx.output,
        || render_view(&dashboard, email.as_deref()),
    )
}
