use chrono::NaiveDate;
use console::style;

use crate::dates;
use crate::metrics::MetricCard;
use crate::ui::icons::{TREND_DOWN, TREND_UP, WARN};

/// One metric card as a block of lines.
pub fn render_card(card: &MetricCard) -> String {
    let mut lines = vec![style(card.kind.title()).dim().to_string()];

    match (card.trend_text(), card.trending_up()) {
        (Some(trend), Some(up)) => {
            let badge = if up {
                style(format!("{}{}", TREND_UP, trend)).green()
            } else {
                style(format!("{}{}", TREND_DOWN, trend)).red()
            };
            lines.push(format!("{}  {}", style(card.value_text()).bold(), badge));
            if let Some(footer) = card.footer() {
                lines.push(footer);
            }
            lines.push(style(card.kind.description()).dim().to_string());
        }
        _ => {
            lines.push(format!("{}{}", WARN, style(card.value_text()).yellow()));
        }
    }

    lines.join("\n")
}

/// All cards, separated by blank lines, in dashboard order.
pub fn render_cards(cards: &[MetricCard]) -> String {
    cards
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Header line above the cards: `DORA Metrics Dashboard · Jun 01, 2024 – Jun 30, 2024`.
pub fn render_heading(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} {} {} – {}",
        style("DORA Metrics Dashboard").bold(),
        style("·").dim(),
        dates::format_display(start),
        dates::format_display(end)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CardState, MetricKind};
    use console::strip_ansi_codes;

    #[test]
    fn available_card_shows_value_trend_and_footer() {
        let card = MetricCard {
            kind: MetricKind::LeadTime,
            state: CardState::Available {
                value: 26.5,
                trend: -4.0,
            },
        };
        let out = strip_ansi_codes(&render_card(&card)).to_string();
        assert!(out.starts_with("Lead Time for Changes"));
        assert!(out.contains("26.50 hours"));
        assert!(out.contains("-4.00%"));
        assert!(out.contains("Trending down this period"));
        assert!(out.contains("Time from commit to deploy"));
    }

    #[test]
    fn unavailable_cards_say_so() {
        let cards: Vec<MetricCard> = MetricKind::ALL
            .into_iter()
            .map(|kind| MetricCard {
                kind,
                state: CardState::Unavailable,
            })
            .collect();
        let out = strip_ansi_codes(&render_cards(&cards)).to_string();
        assert_eq!(out.matches("Unable to load data").count(), 4);
        assert!(!out.contains("Trending"));
    }

    #[test]
    fn heading_shows_window() {
        let out = strip_ansi_codes(&render_heading(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        ))
        .to_string();
        assert!(out.ends_with("Jun 01, 2024 – Jun 30, 2024"));
    }
}
