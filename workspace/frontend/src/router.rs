use std::fmt;
use std::str::FromStr;

/// The three dashboard tabs. Pure local state, no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Dashboard,
    Vendors,
    Contracts,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Vendors, View::Contracts];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Vendors => "Vendors",
            View::Contracts => "Contracts",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Vendors => "vendors",
            View::Contracts => "contracts",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        View::ALL
            .into_iter()
            .find(|view| view.slug().eq_ignore_ascii_case(s) || view.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown view: {} (expected dashboard, vendors or contracts)", s))
    }
}
