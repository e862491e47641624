//! Plain-text renderings of the dashboard tabs.

pub mod contracts;
pub mod dashboard;
pub mod navbar;
pub mod table;
pub mod vendors;

use crate::router::View;
use crate::state::Dashboard;

/// Renders the active tab, header line included.
pub fn render_view(state: &Dashboard, email: Option<&str>) -> String {
    let mut out = navbar::render(state.view, email);
    out.push_str("\n\n");
    if state.loading {
        out.push_str("Loading...\n");
        return out;
    }

    let directory = state.directory();
    let body = match state.view {
        View::Dashboard => dashboard::render(
            &state.summary(),
            &state.expiring(),
            &state.expired(),
            &directory,
        ),
        View::Vendors => vendors::render(&state.filtered_vendors()),
        View::Contracts => {
            contracts::render(&state.contracts, &directory, |c| state.alert_for(c))
        }
    };
    out.push_str(&body);
    out
}
