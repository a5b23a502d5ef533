//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module      | Commands handled                          |
//! |-------------|-------------------------------------------|
//! | `auth`      | `Login`, `Register`, `Logout`, `Status`   |
//! | `dashboard` | `Dashboard`                               |
//! | `releases`  | `Releases`                                |
//! | `config`    | `Config`                                  |

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod releases;

pub use auth::{cmd_login, cmd_logout, cmd_register, cmd_status};
pub use config::cmd_config;
pub use dashboard::cmd_dashboard;
pub use releases::cmd_releases;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Confirm;

use dora_dash::api::ApiClient;
use dora_dash::banner::ErrorBanner;
use dora_dash::config::DoraConfig;
use dora_dash::guard::{self, GuardState, Route};
use dora_dash::session::SessionStore;
use dora_dash::ui::Spinner;
use dora_dash::ui::alert::render_banner;
use dora_dash::ui::icons::{CROSS, LOCK};

/// An error the user has already seen, so `main` only sets the exit code.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

/// Everything a command needs to talk to the API.
pub struct AppContext {
    pub config: DoraConfig,
    pub client: ApiClient,
    pub session: SessionStore,
}

impl AppContext {
    /// Build the client and load any stored session cookie into it.
    pub fn new(config: DoraConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api_url, config.timeout())
            .context("Failed to create API client")?;
        let session = config.session_store();
        session.restore_into(&client);
        Ok(Self {
            config,
            client,
            session,
        })
    }

    async fn check_route(&self, route: Route) -> GuardState {
        let spinner = Spinner::new("Checking session...");
        let state = guard::resolve(route, &self.client).await;
        spinner.clear();
        state
    }

    /// Protected-route guard. Signed-out users get a login hint and an error.
    pub async fn require_auth(&self, route: Route) -> Result<()> {
        match self.check_route(route).await {
            GuardState::Redirect(Route::Login) => {
                eprintln!(
                    "{}{}",
                    LOCK,
                    style("Not signed in. Run `dora login` first.").yellow()
                );
                Err(Reported("Not signed in".into()).into())
            }
            _ => Ok(()),
        }
    }

    /// Guest-only guard. Returns `false` when the user is already signed in
    /// and should be sent home instead.
    pub async fn guest_only(&self, route: Route) -> bool {
        !matches!(
            self.check_route(route).await,
            GuardState::Redirect(Route::Home)
        )
    }

    /// Ask before a destructive or changing action unless `--yes` was given.
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.config.yes {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

/// Print the banner to stderr and turn it into a [`Reported`] error.
pub fn report(banner: &ErrorBanner) -> anyhow::Error {
    if let Some(text) = render_banner(banner) {
        eprintln!("{}", text);
    }
    Reported(banner.message().unwrap_or("Request failed").to_string()).into()
}

/// Errors that were not already rendered as a banner.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{}{}", CROSS, style(format!("{:#}", err)).red());
}
