//! Line-driven dashboard session.
//!
//! Keeps one [`Dashboard`] alive between commands so the search term,
//! active tab and unfinished form drafts survive until the session ends.

use anyhow::Result;
use frontend::components::render_view;
use frontend::{Dashboard, Modal, ReportOutcome, View};
use model::{RowId, VendorCategory};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, info};

use super::Context;
use crate::output::success;

const HELP: &str = "\
Commands:
  view <dashboard|vendors|contracts>  switch tab
  refresh                             reload vendors and contracts
  search [term]                       filter vendors by name or category
  add-vendor                          open the add-vendor form
  add-contract                        open the add-contract form
  report <vendor id>                  report a compliance issue
  whoami                              show the signed-in user
  logout                              sign out and leave
  help                                this text
  quit                                leave";

enum Step {
    Continue,
    Exit,
}

/// Runs the session until `quit`, `logout`, end of input or an external
/// sign-out.
pub async fn run<R: BufRead, W: Write>(ctx: &Context, input: &mut R, output: &mut W) -> Result<()> {
    let session = ctx.require_session().await?;
    let email = session.user.email.clone();
    let mut subscription = ctx.auth.subscribe();

    let mut dashboard = Dashboard::new(ctx.auth.clone(), ctx.storage.clone(), ctx.clock.clone());
    dashboard.refresh().await;
    writeln!(output, "{}", render_view(&dashboard, email.as_deref()))?;
    info!("Interactive session started");

    loop {
        if subscription.has_changed() && subscription.latest().is_none() {
            writeln!(output, "Session ended.")?;
            break;
        }

        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            break;
        };

        let step = execute(ctx, &mut dashboard, email.as_deref(), &line, input, output).await?;
        if let Step::Exit = step {
            break;
        }
    }

    subscription.unsubscribe();
    debug!("Interactive session finished");
    Ok(())
}

async fn execute<R: BufRead, W: Write>(
    ctx: &Context,
    dashboard: &mut Dashboard,
    email: Option<&str>,
    line: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Step> {
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" | "?" => writeln!(output, "{}", HELP)?,
        "quit" | "exit" => return Ok(Step::Exit),
        "view" => match View::from_str(argument) {
            Ok(view) => {
                dashboard.set_view(view);
                writeln!(output, "{}", render_view(dashboard, email))?;
            }
            Err(e) => writeln!(output, "{}", e)?,
        },
        "refresh" => {
            dashboard.refresh().await;
            writeln!(output, "{}", render_view(dashboard, email))?;
        }
        "search" => {
            dashboard.set_search(argument);
            dashboard.set_view(View::Vendors);
            writeln!(output, "{}", render_view(dashboard, email))?;
        }
        "add-vendor" => add_vendor(dashboard, email, input, output).await?,
        "add-contract" => add_contract(dashboard, email, input, output).await?,
        "report" => report(dashboard, email, argument, input, output).await?,
        "whoami" => match ctx.signed_in_email().await {
            Some(address) => writeln!(output, "{}", address)?,
            None => writeln!(output, "Not signed in")?,
        },
        "logout" => {
            if let Err(e) = ctx.auth.sign_out().await {
                writeln!(output, "Signed out locally. Server said: {}", e)?;
            } else {
                writeln!(output, "{}", success("Signed out"))?;
            }
            return Ok(Step::Exit);
        }
        other => writeln!(output, "Unknown command: {}. Type `help` for a list.", other)?,
    }
    Ok(Step::Continue)
}

async fn add_vendor<R: BufRead, W: Write>(
    dashboard: &mut Dashboard,
    email: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    dashboard.open_modal(Modal::AddVendor);
    let choices: Vec<&str> = VendorCategory::CHOICES.iter().map(|c| c.label()).collect();

    let mut draft = dashboard.vendor_draft.clone();
    let Some(name) = prompt(input, output, "Name", &draft.name)? else {
        dashboard.close_modal();
        return Ok(());
    };
    draft.name = name;
    let category_label = format!("Category ({})", choices.join(", "));
    if let Some(category) = prompt(input, output, &category_label, draft.category.label())? {
        draft.category = VendorCategory::from_label(&category);
    }
    if let Some(spend) = prompt(input, output, "Total spend", &draft.total_spend)? {
        draft.total_spend = spend;
    }
    if let Some(contact) = prompt(input, output, "Contact", &draft.contact)? {
        draft.contact = contact;
    }
    dashboard.vendor_draft = draft;

    match dashboard.submit_vendor().await {
        Ok(()) => {
            writeln!(output, "{}", success("Vendor added"))?;
            writeln!(output, "{}", render_view(dashboard, email))?;
        }
        Err(e) => {
            writeln!(output, "{}", e)?;
            writeln!(output, "Draft kept. Run add-vendor again to fix it.")?;
            dashboard.close_modal();
        }
    }
    Ok(())
}

async fn add_contract<R: BufRead, W: Write>(
    dashboard: &mut Dashboard,
    email: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    if dashboard.vendors.is_empty() {
        writeln!(output, "Add a vendor first.")?;
        return Ok(());
    }
    dashboard.open_modal(Modal::AddContract);
    for vendor in &dashboard.vendors {
        writeln!(output, "  {:>6}  {}", vendor.id.to_string(), vendor.name)?;
    }

    let mut draft = dashboard.contract_draft.clone();
    let Some(name) = prompt(input, output, "Contract name", &draft.contract_name)? else {
        dashboard.close_modal();
        return Ok(());
    };
    draft.contract_name = name;
    let current_vendor = draft.vendor_id.as_ref().map(RowId::to_string).unwrap_or_default();
    if let Some(vendor) = prompt(input, output, "Vendor id", &current_vendor)? {
        let vendor = vendor.trim();
        draft.vendor_id = (!vendor.is_empty()).then(|| RowId::parse(vendor));
    }
    if let Some(end_date) = prompt(input, output, "End date (YYYY-MM-DD)", &draft.end_date)? {
        draft.end_date = end_date;
    }
    if let Some(value) = prompt(input, output, "Value", &draft.value)? {
        draft.value = value;
    }
    dashboard.contract_draft = draft;

    match dashboard.submit_contract().await {
        Ok(()) => {
            writeln!(output, "{}", success("Contract added"))?;
            writeln!(output, "{}", render_view(dashboard, email))?;
        }
        Err(e) => {
            writeln!(output, "{}", e)?;
            writeln!(output, "Draft kept. Run add-contract again to fix it.")?;
            dashboard.close_modal();
        }
    }
    Ok(())
}

async fn report<R: BufRead, W: Write>(
    dashboard: &mut Dashboard,
    email: Option<&str>,
    argument: &str,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    if argument.is_empty() {
        writeln!(output, "Usage: report <vendor id>")?;
        return Ok(());
    }
    let id = RowId::parse(argument);
    let reason = prompt(input, output, "Reason (blank to cancel)", "")?;

    match dashboard.report_issue(&id, reason.as_deref()).await {
        Ok(ReportOutcome::Skipped) => writeln!(output, "Cancelled.")?,
        Ok(ReportOutcome::Reported) => {
            writeln!(output, "{}", success("Issue reported"))?;
            writeln!(output, "{}", render_view(dashboard, email))?;
        }
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

/// Asks for one field. An empty answer keeps `current`; `None` means the
/// input ended.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    if current.is_empty() {
        write!(output, "{}: ", label)?;
    } else {
        write!(output, "{} [{}]: ", label, current)?;
    }
    output.flush()?;

    Ok(read_line(input)?.map(|answer| {
        if answer.is_empty() {
            current.to_string()
        } else {
            answer
        }
    }))
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded_backend, signed_in_context};
    use frontend::Table;
    use frontend::mock_backend::Operation;
    use std::io::Cursor;

    async fn session(script: &str) -> (std::sync::Arc<frontend::mock_backend::InMemoryBackend>, String) {
        let (backend, ctx) = signed_in_context(seeded_backend()).await;
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run(&ctx, &mut input, &mut output).await.unwrap();
        (backend, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_starts_on_dashboard_and_switches_views() {
        let (_, out) = session("view contracts\nview nowhere\nquit\n").await;

        assert!(out.starts_with("VendorConnect | [Dashboard]"));
        assert!(out.contains("[Contracts]"));
        assert!(out.contains("Unknown view"));
    }

    #[tokio::test]
    async fn test_failed_vendor_submit_keeps_draft() {
        let script = "add-vendor\n\nHardware\n-5\n\nadd-vendor\nInitech\n\n50\n\nquit\n";
        let (backend, out) = session(script).await;

        assert!(out.contains("Name is required; Total spend cannot be negative"));
        assert!(out.contains("Draft kept"));
        // The second attempt offers the kept draft values.
        assert!(out.contains("Category (IT Services, Logistics, Hardware, Consulting) [Hardware]: "));
        assert!(out.contains("Vendor added"));
        assert_eq!(backend.calls(Operation::Insert), 1);

        let rows = backend.rows(Table::Vendors);
        let row = rows.iter().find(|r| r["name"] == "Initech").unwrap();
        assert_eq!(row["category"], "Hardware");
        assert_eq!(row["total_spend"], 50.0);
    }

    #[tokio::test]
    async fn test_add_contract_flow() {
        let script = "add-contract\nMaintenance\n1\n2026-11-01\n900\nquit\n";
        let (backend, out) = session(script).await;

        assert!(out.contains("Contract added"));
        assert!(out.contains("Maintenance (Acme Corp)"));
        assert_eq!(backend.rows(Table::Contracts).len(), 4);
    }

    #[tokio::test]
    async fn test_report_prompts_for_reason() {
        let (backend, out) = session("report 1\n\nreport 1\nlate delivery\nquit\n").await;

        assert!(out.contains("Cancelled."));
        assert!(out.contains("Issue reported"));
        assert_eq!(backend.calls(Operation::Update), 1);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (backend, out) = session("logout\nview vendors\n").await;

        assert!(out.contains("Signed out"));
        assert!(!out.contains("[Vendors]"));
        assert!(backend.sessions().current().is_none());
        assert_eq!(backend.sessions().subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let (_, out) = session("search acme\n").await;
        let (_, vendors_tab) = out.split_once("[Vendors]").unwrap();
        assert!(vendors_tab.contains("Acme Corp"));
        assert!(!vendors_tab.contains("Globex"));
    }
}
