//! The home route: metric cards above the deployment-volume chart.

use anyhow::Result;

use dora_dash::dates;
use dora_dash::guard::Route;
use dora_dash::metrics::{DashboardView, VolumeChart};
use dora_dash::ui::Spinner;
use dora_dash::ui::cards::{render_cards, render_heading};
use dora_dash::ui::chart::{DEFAULT_BAR_WIDTH, render_chart};

use super::{AppContext, report};
use crate::DashboardArgs;

pub async fn cmd_dashboard(ctx: &AppContext, args: &DashboardArgs) -> Result<()> {
    ctx.require_auth(Route::Home).await?;
    render_home(ctx, args).await
}

/// Load and print the dashboard without running the guard.
pub async fn render_home(ctx: &AppContext, args: &DashboardArgs) -> Result<()> {
    let today = dates::today();

    let mut view = DashboardView::new(today, ctx.config.dashboard_days());
    if args.start.is_some() || args.end.is_some() {
        let start = args.start.unwrap_or(view.start());
        let end = args.end.unwrap_or(view.end());
        if start > end {
            anyhow::bail!("--start ({}) is after --end ({})", start, end);
        }
        view.set_range(start, end);
    }

    let mut chart = VolumeChart::new(today);
    chart.set_range(args.range.unwrap_or(ctx.config.chart_range()));
    if let Some(selection) = &args.platform {
        chart.set_selection(selection.clone());
    }

    let spinner = Spinner::new("Loading metrics...");
    let (metrics_loaded, volume) = tokio::join!(view.load(&ctx.client), chart.load(&ctx.client));
    spinner.clear();

    // The chart has no banner of its own; it just renders empty.
    if let Err(e) = volume {
        tracing::warn!("deployment volume unavailable: {}", e);
    }

    println!("{}", render_heading(view.start(), view.end()));
    println!();
    println!("{}", render_cards(&view.cards()));
    println!();
    println!("{}", render_chart(&chart.series(), chart.range(), DEFAULT_BAR_WIDTH));

    if !metrics_loaded {
        return Err(report(view.banner()));
    }
    Ok(())
}
