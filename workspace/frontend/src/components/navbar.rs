use crate::router::View;

/// Header line: brand, tabs with the active one bracketed, signed-in user.
pub fn render(active: View, email: Option<&str>) -> String {
    let tabs: Vec<String> = View::ALL
        .iter()
        .map(|view| {
            if *view == active {
                format!("[{}]", view.title())
            } else {
                view.title().to_string()
            }
        })
        .collect();

    let mut line = format!("VendorConnect | {}", tabs.join("  "));
    if let Some(email) = email {
        line.push_str(" | ");
        line.push_str(email);
    }
    line
}
