//! Release table rendering.

use console::{Alignment, measure_text_width, pad_str, style};

use crate::api::{LinkKind, Release};
use crate::dates;
use crate::releases::{Column, ReleaseListView};

pub const EMPTY_TEXT: &str = "No results.";

const GAP: &str = "  ";

/// Plain text of one cell.
pub fn cell_text(release: &Release, column: Column) -> String {
    match column {
        Column::Platform => release.platform.to_string(),
        Column::ReleaseType => release.release_type.to_string(),
        Column::Status => status_text(release.is_successful).to_string(),
        Column::Version => release.version.clone(),
        Column::RolloutDate => dates::format_display(release.rollout_date.date_naive()),
        Column::Links => LinkKind::ALL
            .into_iter()
            .filter(|kind| release.link(*kind).is_some())
            .map(LinkKind::label)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn status_text(is_successful: bool) -> &'static str {
    if is_successful { "Success" } else { "Failed" }
}

fn styled_cell(release: &Release, column: Column) -> String {
    let text = cell_text(release, column);
    match column {
        Column::Status if release.is_successful => style(text).green().to_string(),
        Column::Status => style(text).red().to_string(),
        Column::Platform => style(text).bold().to_string(),
        Column::Links => style(text).cyan().to_string(),
        _ => text,
    }
}

/// The current page of `view` with its header and footer.
pub fn render_release_table(view: &ReleaseListView) -> String {
    let columns = view.visible_columns();
    let rows = view.page_rows();

    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|r| measure_text_width(&cell_text(r, *col)))
                .chain(std::iter::once(col.header().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| pad_str(&style(col.header()).bold().to_string(), *w, Alignment::Left, None).into_owned())
        .collect();
    out.push_str(header.join(GAP).trim_end());
    out.push('\n');

    let rule_width = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    out.push_str(&style("─".repeat(rule_width)).dim().to_string());
    out.push('\n');

    if rows.is_empty() {
        out.push_str(EMPTY_TEXT);
        out.push('\n');
    }
    for release in &rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| pad_str(&styled_cell(release, *col), *w, Alignment::Left, None).into_owned())
            .collect();
        out.push_str(cells.join(GAP).trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&footer(view));
    out
}

/// `Page 2 of 3 · 23 release(s) · 10 rows per page`, then a hint naming
/// the `--page` values for the neighbouring pages when there are any.
pub fn footer(view: &ReleaseListView) -> String {
    let count = view.row_count();
    let mut out = format!(
        "Page {} of {} {} {} release{} {} {} rows per page",
        view.page_index() + 1,
        view.page_count(),
        style("·").dim(),
        count,
        if count == 1 { "" } else { "s" },
        style("·").dim(),
        view.page_size()
    );

    let current = view.page_index() + 1;
    let mut hints = Vec::new();
    if view.can_previous() {
        hints.push(format!("previous: --page {}", current - 1));
    }
    if view.can_next() {
        hints.push(format!("next: --page {}", current + 1));
    }
    if !hints.is_empty() {
        out.push('\n');
        out.push_str(&style(hints.join(", ")).dim().to_string());
    }
    out
}

/// Details shown before a delete is confirmed.
pub fn render_delete_details(release: &Release) -> String {
    [
        ("Platform", release.platform.to_string()),
        ("Version", release.version.clone()),
        ("Release Type", release.release_type.to_string()),
        (
            "Rollout Date",
            dates::format_display(release.rollout_date.date_naive()),
        ),
    ]
    .iter()
    .map(|(label, value)| format!("  {} {}", style(format!("{}:", label)).dim(), value))
    .collect::<Vec<_>>()
    .join("\n")
}
