//! Sign-in, registration and session commands.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password};

use dora_dash::api::{AuthApi, LoginResponse};
use dora_dash::auth_form::{LOGIN_FAILED, LoginForm, REGISTRATION_FAILED, RegisterForm};
use dora_dash::banner::ErrorBanner;
use dora_dash::guard::{self, Route};
use dora_dash::ui::Spinner;
use dora_dash::ui::icons::{CHECK, LOCK, WARN};

use super::dashboard::render_home;
use super::{AppContext, report};
use crate::DashboardArgs;

pub async fn cmd_login(
    ctx: &AppContext,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    if !ctx.guest_only(Route::Login).await {
        println!("Already signed in.");
        return render_home(ctx, &DashboardArgs::default()).await;
    }

    let username = match username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let form = LoginForm::new(username, password);
    let spinner = Spinner::new("Signing in...");
    match form.submit(&ctx.client).await {
        Ok(response) => {
            spinner.success(&welcome(&response, "Signed in"));
            signed_in(ctx).await
        }
        Err(e) => {
            spinner.clear();
            let mut banner = ErrorBanner::new();
            banner.show(e.display_message(LOGIN_FAILED));
            Err(report(&banner))
        }
    }
}

pub async fn cmd_register(
    ctx: &AppContext,
    username: String,
    email: String,
    password: Option<String>,
    confirm_password: Option<String>,
) -> Result<()> {
    if !ctx.guest_only(Route::Register).await {
        println!("Already signed in.");
        return render_home(ctx, &DashboardArgs::default()).await;
    }

    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };
    let confirm_password = match confirm_password {
        Some(p) => p,
        None => prompt_password("Confirm password")?,
    };

    let form = RegisterForm {
        username,
        email,
        password,
        confirm_password,
    };
    let mut banner = ErrorBanner::new();
    if let Err(e) = form.validate() {
        banner.show(e.to_string());
        return Err(report(&banner));
    }

    let spinner = Spinner::new("Creating account...");
    match form.submit(&ctx.client).await {
        Ok(response) => {
            spinner.success(&welcome(&response, "Account created"));
            signed_in(ctx).await
        }
        Err(e) => {
            spinner.clear();
            banner.show(e.display_message(REGISTRATION_FAILED));
            Err(report(&banner))
        }
    }
}

/// Server errors are logged; the local session is removed regardless.
pub async fn cmd_logout(ctx: &AppContext) -> Result<()> {
    if let Err(e) = ctx.client.logout().await {
        tracing::warn!("logout request failed: {}", e);
    }
    ctx.session.clear()?;
    println!("{}Signed out", CHECK);
    println!(
        "{}",
        style(format!("Run `dora login` to sign in again ({}).", Route::Login.path())).dim()
    );
    Ok(())
}

pub async fn cmd_status(ctx: &AppContext) -> Result<()> {
    let authenticated = guard::check_authenticated(&ctx.client).await;
    println!("API:     {}", ctx.client.base_url());
    println!("Session: {}", ctx.session.path().display());
    if authenticated {
        println!("{}{}", CHECK, style("Authenticated").green());
    } else {
        println!("{}{}", LOCK, style("Not authenticated").yellow());
    }
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

fn welcome(response: &LoginResponse, action: &str) -> String {
    match &response.user {
        Some(user) => format!("{} as {}", action, user.username),
        None => action.to_string(),
    }
}

/// Keep the new cookie, then land on the home route.
async fn signed_in(ctx: &AppContext) -> Result<()> {
    if !ctx.session.persist_from(&ctx.client)? {
        eprintln!(
            "{}{}",
            WARN,
            style("The server set no session cookie; the next command will not be signed in.")
                .yellow()
        );
    }
    tracing::debug!(route = Route::Home.path(), "redirecting after sign-in");
    println!();
    render_home(ctx, &DashboardArgs::default()).await
}
