use console::style;

use crate::metrics::{ChartSeries, TimeRange};
use crate::ui::icons::CHART;

pub const EMPTY_TEXT: &str = "No deployments in this range.";
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Deployment volume as one horizontal bar per date, scaled to `bar_width`.
pub fn render_chart(series: &ChartSeries, range: TimeRange, bar_width: usize) -> String {
    let mut lines = vec![
        format!("{}{}", CHART, style("Deployment Volume").bold()),
        style("Number of releases by platform over time").dim().to_string(),
        format!("{} {} {}", style(&series.label).cyan(), style("·").dim(), range.label()),
        String::new(),
    ];

    if series.points.is_empty() {
        lines.push(EMPTY_TEXT.to_string());
        return lines.join("\n");
    }

    let max = series.max_value();
    for point in &series.points {
        let len = bar_len(point.value, max, bar_width);
        lines.push(format!(
            "{}  {}{} {}",
            point.date.format("%b %d"),
            style("█".repeat(len)).cyan(),
            " ".repeat(bar_width - len),
            format_count(point.value)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} {}",
        style("Total:").dim(),
        format_count(series.total())
    ));
    lines.join("\n")
}

/// Non-zero values always get at least one block.
fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if value <= 0.0 || max <= 0.0 {
        return 0;
    }
    let scaled = (value / max * width as f64).round() as usize;
    scaled.clamp(1, width)
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ChartPoint;
    use chrono::NaiveDate;
    use console::strip_ansi_codes;

    fn series(values: &[f64]) -> ChartSeries {
        ChartSeries {
            label: "Total".into(),
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| ChartPoint {
                    date: NaiveDate::from_ymd_opt(2024, 6, 1 + i as u32).unwrap(),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        assert_eq!(bar_len(4.0, 4.0, 40), 40);
        assert_eq!(bar_len(1.0, 4.0, 40), 10);
        assert_eq!(bar_len(0.01, 100.0, 40), 1);
        assert_eq!(bar_len(0.0, 4.0, 40), 0);
        assert_eq!(bar_len(3.0, 0.0, 40), 0);
    }

    #[test]
    fn renders_one_line_per_date_and_total() {
        let out = strip_ansi_codes(&render_chart(&series(&[2.0, 0.0, 4.0]), TimeRange::Days7, 8))
            .to_string();
        assert!(out.contains("Total · Last 7 days"));
        assert!(out.contains("Jun 01  ████     2"));
        assert!(out.contains("Jun 02           0"));
        assert!(out.contains("Jun 03  ████████ 4"));
        assert!(out.ends_with("Total: 6"));
    }

    #[test]
    fn empty_series() {
        let out = render_chart(&series(&[]), TimeRange::Days90, 10);
        assert!(strip_ansi_codes(&out).contains(EMPTY_TEXT));
    }
}
