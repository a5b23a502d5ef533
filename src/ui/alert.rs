use console::style;

use crate::banner::ErrorBanner;
use crate::releases::FieldChange;
use crate::ui::icons::CROSS;

/// The banner as a red block, or `None` when it is dismissed.
pub fn render_banner(banner: &ErrorBanner) -> Option<String> {
    banner.message().map(|message| {
        format!(
            "{}{}\n   {}",
            CROSS,
            style(ErrorBanner::TITLE).red().bold(),
            style(message).red()
        )
    })
}

/// Body of the edit confirmation: one line per changed field.
pub fn render_changes(changes: &[FieldChange]) -> String {
    let mut out = format!("{}\n", style("Please review the following changes:").bold());
    if changes.is_empty() {
        out.push_str(&format!("  {}\n", style("No fields changed").dim()));
    }
    for change in changes {
        out.push_str(&format!("  {} {}\n", style("•").yellow(), change));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::releases::form::Field;
    use console::strip_ansi_codes;

    #[test]
    fn dismissed_banner_renders_nothing() {
        let mut banner = ErrorBanner::new();
        assert!(render_banner(&banner).is_none());

        banner.show("Failed to load releases");
        let out = strip_ansi_codes(&render_banner(&banner).unwrap()).to_string();
        assert!(out.contains("Error"));
        assert!(out.contains("Failed to load releases"));
    }

    #[test]
    fn change_list_lines() {
        let out = render_changes(&[FieldChange {
            field: Field::Version,
            old: Some("1.0".into()),
            new: Some("1.1".into()),
        }]);
        let out = strip_ansi_codes(&out).to_string();
        assert!(out.contains("• Version: 1.0 → 1.1"));

        let none = strip_ansi_codes(&render_changes(&[])).to_string();
        assert!(none.contains("No fields changed"));
    }
}
