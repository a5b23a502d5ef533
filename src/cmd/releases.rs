//! `dora releases` — list, create, edit, delete and open release records.

use anyhow::{Context, Result, anyhow};
use console::style;

use dora_dash::api::{ApiClient, LinkKind, Platform, RecordId, Release, ReleaseType};
use dora_dash::dates::{self, DateRange};
use dora_dash::guard::Route;
use dora_dash::releases::{ColumnFilters, FormMode, ReleaseForm, ReleasePage, Submission};
use dora_dash::ui::Spinner;
use dora_dash::ui::alert::render_changes;
use dora_dash::ui::icons::{CHECK, LINK, ROCKET, TRASH};
use dora_dash::ui::table::{render_delete_details, render_release_table};

use super::{AppContext, report};
use crate::{ListArgs, ReleaseFields, ReleasesCommands};

type Page = ReleasePage<ApiClient>;

pub async fn cmd_releases(ctx: &AppContext, command: ReleasesCommands) -> Result<()> {
    ctx.require_auth(Route::Releases).await?;
    let mut page = ReleasePage::new(ctx.client.clone());

    match command {
        ReleasesCommands::List(args) => list(ctx, &mut page, &args).await,
        ReleasesCommands::Create(fields) => create(&mut page, &fields).await,
        ReleasesCommands::Edit { id, fields } => edit(ctx, &mut page, &id, &fields).await,
        ReleasesCommands::Delete { id } => delete(ctx, &mut page, &id).await,
        ReleasesCommands::Open { id, link } => open_link(&mut page, &id, link).await,
    }
}

async fn load(page: &mut Page, quiet: bool) -> Result<()> {
    let spinner = if quiet {
        Spinner::hidden()
    } else {
        Spinner::new("Loading releases...")
    };
    let loaded = page.refresh().await;
    spinner.clear();
    if !loaded {
        return Err(report(page.banner()));
    }
    Ok(())
}

async fn list(ctx: &AppContext, page: &mut Page, args: &ListArgs) -> Result<()> {
    load(page, args.json).await?;

    let view = page.view_mut();
    view.set_date_range(DateRange::new(args.start, args.end));
    view.set_filters(ColumnFilters {
        platform: choice(args.platform.as_deref()).map(Platform::from),
        release_type: choice(args.release_type.as_deref()).map(ReleaseType::from),
        status: args.status,
    });
    view.set_sort(args.sort);
    view.set_page_size(args.page_size.unwrap_or(ctx.config.page_size()))?;
    if let Some(columns) = &args.columns {
        view.set_visible_columns(columns);
    }
    view.set_page(args.page.saturating_sub(1));

    if args.json {
        let rows = view.page_rows();
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("Failed to serialize releases")?
        );
        return Ok(());
    }

    println!(
        "{} {}   {} {}",
        style("Platforms:").dim(),
        view.platform_options().join(", "),
        style("Types:").dim(),
        view.release_type_options().join(", ")
    );
    println!();
    println!("{}", render_release_table(view));
    Ok(())
}

/// `None` for a missing value or "all".
fn choice(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

async fn create(page: &mut Page, fields: &ReleaseFields) -> Result<()> {
    let mut form = ReleaseForm::new(dates::today());
    fields.apply_to(&mut form);

    let spinner = Spinner::new("Creating release...");
    let created = page.create(&form).await;
    spinner.clear();
    match created {
        Ok(release) => {
            println!("{}Created {}", ROCKET, describe(&release));
            Ok(())
        }
        Err(_) => Err(report(page.banner())),
    }
}

async fn edit(ctx: &AppContext, page: &mut Page, id: &str, fields: &ReleaseFields) -> Result<()> {
    load(page, false).await?;
    let original = find(page, id)?;

    let mut form = ReleaseForm::from_release(&original);
    fields.apply_to(&mut form);

    let submission = match form.submit(&FormMode::Edit(original.clone())) {
        Ok(submission) => submission,
        Err(e) => {
            page.banner_mut().show(e.to_string());
            return Err(report(page.banner()));
        }
    };

    if let Submission::NeedsConfirmation { changes, .. } = &submission {
        print!("{}", render_changes(changes));
        if !ctx.confirm("Save these changes?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let spinner = Spinner::new("Updating release...");
    let updated = page.update(&original.id, submission.data()).await;
    spinner.clear();
    match updated {
        Ok(release) => {
            println!("{}Updated {}", CHECK, describe(&release));
            Ok(())
        }
        Err(_) => Err(report(page.banner())),
    }
}

async fn delete(ctx: &AppContext, page: &mut Page, id: &str) -> Result<()> {
    load(page, false).await?;
    let release = find(page, id)?;

    println!("{}", style("Delete this release?").bold());
    println!("{}", render_delete_details(&release));
    if !ctx.confirm("This cannot be undone. Continue?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let spinner = Spinner::new("Deleting release...");
    let deleted = page.delete(&release.id).await;
    spinner.clear();
    match deleted {
        Ok(()) => {
            println!("{}Deleted {}", TRASH, describe(&release));
            Ok(())
        }
        Err(_) => Err(report(page.banner())),
    }
}

async fn open_link(page: &mut Page, id: &str, kind: LinkKind) -> Result<()> {
    load(page, false).await?;
    let release = find(page, id)?;
    let url = release
        .link(kind)
        .ok_or_else(|| anyhow!("Release {} has no {} link", release.id, kind.label()))?;

    println!("{}Opening {}", LINK, url);
    open::that(url).with_context(|| format!("Failed to open {}", url))?;
    Ok(())
}

fn find(page: &Page, id: &str) -> Result<Release> {
    let id = RecordId::from(id);
    page.view()
        .find(&id)
        .cloned()
        .ok_or_else(|| anyhow!("Release {} not found", id))
}

fn describe(release: &Release) -> String {
    format!(
        "{} {} {}",
        style(&release.platform).bold(),
        release.version,
        style(format!("(#{})", release.id)).dim()
    )
}

impl ReleaseFields {
    /// Copy the flags that were given onto `form`. An empty link clears it.
    fn apply_to(&self, form: &mut ReleaseForm) {
        if let Some(platform) = &self.platform {
            form.platform = Some(platform.clone());
        }
        if let Some(release_type) = &self.release_type {
            form.release_type = Some(release_type.clone());
        }
        if let Some(version) = &self.version {
            form.version = version.clone();
        }
        if let Some(date) = self.rollout_date {
            form.set_rollout_date(date);
        }
        if self.failed {
            form.is_successful = false;
        } else if self.successful {
            form.is_successful = true;
        }
        if let Some(link) = &self.mcm_link {
            form.mcm_link = link.clone();
        }
        if let Some(link) = &self.ci_job_link {
            form.ci_job_link = link.clone();
        }
        if let Some(link) = &self.commit_list_link {
            form.commit_list_link = link.clone();
        }
    }
}
