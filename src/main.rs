use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use dora_dash::api::{LinkKind, Platform, ReleaseType};
use dora_dash::config::{DoraConfig, Overrides};
use dora_dash::metrics::{SeriesSelection, TimeRange};
use dora_dash::releases::{Column, SortState, StatusFilter};
use dora_dash::{dates, logging};

mod cmd;

#[derive(Parser)]
#[command(name = "dora")]
#[command(version, about = "Terminal dashboard for DORA metrics and release records")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Base URL of the DORA API. Overrides dora.toml.
    #[arg(long, global = true, env = "DORA_API_URL")]
    pub api_url: Option<String>,

    /// Path to dora.toml
    #[arg(long, global = true, env = "DORA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where the session cookie is kept between runs
    #[arg(long, global = true, env = "DORA_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            api_url: self.api_url.clone(),
            session_file: self.session_file.clone(),
            verbose: self.verbose,
            yes: self.yes,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and open the dashboard
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account, sign in and open the dashboard
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show whether the stored session is still valid
    Status,
    /// Metric cards and deployment volume
    Dashboard(DashboardArgs),
    /// List and manage release records
    Releases {
        #[command(subcommand)]
        command: ReleasesCommands,
    },
    /// View or initialise dora.toml
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Args, Clone, Default)]
pub struct DashboardArgs {
    /// First day of the metrics window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last day of the metrics window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Chart range: 7d, 30d, 90d
    #[arg(long)]
    pub range: Option<TimeRange>,

    /// Chart series: Total or one platform
    #[arg(long)]
    pub platform: Option<SeriesSelection>,
}

#[derive(Subcommand, Clone)]
pub enum ReleasesCommands {
    /// Show the release table
    List(ListArgs),
    /// Log a new release
    Create(ReleaseFields),
    /// Change an existing release after reviewing the changes
    Edit {
        id: String,
        #[command(flatten)]
        fields: ReleaseFields,
    },
    /// Delete a release after confirmation
    Delete { id: String },
    /// Open one of a release's links in the browser
    Open {
        id: String,
        /// mcm, ci, commits
        #[arg(long)]
        link: LinkKind,
    },
}

#[derive(Args, Clone)]
pub struct ListArgs {
    /// Only releases rolled out on or after this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Only releases rolled out on or before this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Platform name, or "all"
    #[arg(long)]
    pub platform: Option<String>,

    /// Release type, or "all"
    #[arg(long = "type")]
    pub release_type: Option<String>,

    /// all, success, failed
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Column to sort by, optionally suffixed with :asc or :desc
    #[arg(long)]
    pub sort: Option<SortState>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 10, 20, 30, 40, 50
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Comma-separated columns to show
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<Column>>,

    /// Print the current page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone, Default)]
pub struct ReleaseFields {
    #[arg(long)]
    pub platform: Option<Platform>,

    #[arg(long = "type")]
    pub release_type: Option<ReleaseType>,

    #[arg(long)]
    pub version: Option<String>,

    /// YYYY-MM-DD, defaults to today for new releases
    #[arg(long, value_parser = parse_date_arg)]
    pub rollout_date: Option<NaiveDate>,

    /// Mark the release as failed
    #[arg(long, conflicts_with = "successful")]
    pub failed: bool,

    /// Mark the release as successful
    #[arg(long)]
    pub successful: bool,

    #[arg(long)]
    pub mcm_link: Option<String>,

    #[arg(long)]
    pub ci_job_link: Option<String>,

    #[arg(long)]
    pub commit_list_link: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the config file and effective values
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default dora.toml
    Init,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    dates::parse_date(raw).ok_or_else(|| format!("invalid date '{}': expected YYYY-MM-DD", raw))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<cmd::Reported>().is_none() {
                cmd::print_error(&e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DoraConfig::resolve(cli.overrides())?;
    let _log_guard = logging::init(config.log_level(), config.verbose, config.log_dir())?;
    tracing::debug!(api_url = %config.api_url, config = %config.config_path.display(), "starting");

    match cli.command {
        Commands::Config { command } => cmd::cmd_config(&config, command),
        Commands::Login { username, password } => {
            let ctx = cmd::AppContext::new(config)?;
            cmd::cmd_login(&ctx, username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let ctx = cmd::AppContext::new(config)?;
            cmd::cmd_register(&ctx, username, email, password, confirm_password).await
        }
        Commands::Logout => {
            let ctx = cmd::AppContext::new(config)?;
            cmd::cmd_logout(&ctx).await
        }
        Commands::Status => {
            let ctx = cmd::AppContext::new(config)?;
            cmd::cmd_status(&ctx).await
        }
        Commands::Dashboard(args) => {
            let ctx = cmd::AppContext::new(config)?;
            cmd::cmd_dashboard(&ctx, &args).await
        }
        Commands::Releases { command } => {
            let ctx = cmd::AppContext::new(config)?;
            cmd::cmd_releases(&ctx, command).await
        }
    }
}
