//! Configuration view and validation commands — `dora config`.

use anyhow::{Context, Result};

use dora_dash::config::{DoraConfig, DoraToml};

use crate::ConfigCommands;

pub fn cmd_config(config: &DoraConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &config.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Dora Configuration");
            println!("==================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No dora.toml found at {}", config_path.display());
                println!("Using default configuration:");
            }
            println!();
            let content =
                toml::to_string_pretty(&config.toml).context("Failed to serialize dora.toml")?;
            for line in content.lines() {
                println!("  {}", line);
            }
            println!();

            // Effective values (including env/CLI overrides)
            println!("Effective values (with env/CLI overrides):");
            println!("  api_url = \"{}\"", config.api_url);
            println!("  session_file = \"{}\"", config.session_file.display());
            println!("  page_size = {}", config.page_size());
            println!("  chart_range = \"{}\"", config.chart_range());
            println!();

            if !config_path.exists() {
                println!("Run 'dora config init' to create a dora.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No dora.toml found. Using defaults (valid).");
            }

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("dora.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            DoraToml::default().save(config_path)?;

            println!("Created dora.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, timeout_secs");
            println!("  - [releases] page_size");
            println!("  - [dashboard] default_range_days, chart_range");
            println!("  - [logging] level, dir");
            println!();
        }
    }

    Ok(())
}
