use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::OutputConfig;
use crate::config::Config;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
}

#[derive(Serialize)]
struct InitOutput {
    status: String,
    config: String,
}

pub async fn run(args: InitArgs, config_path: &Path, output: OutputConfig) -> Result<()> {
    if config_path.exists() && !args.force {
        if output.json {
            let json_output = InitOutput {
                status: "already_initialized".to_string(),
                config: config_path.display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&json_output)?);
            return Ok(());
        }
        bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    config.save(config_path)?;

    if output.json {
        let json_output = InitOutput {
            status: "initialized".to_string(),
            config: config_path.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else if !output.quiet {
        println!("{} Wrote {}", "✓".green(), config_path.display());
        if output.verbose {
            println!(
                "  Database: {}@{}:{}/{}",
                config.database.user,
                config.database.host,
                config.database.port,
                config.database.name
            );
        }
        println!("\nNext steps:");
        println!("  Set {} and {}", "LEADDESK_DB_PASSWORD".cyan(), "LEADDESK_JWT_SECRET".cyan());
        println!("  {} to create a sign-in account", "leaddesk admin create".cyan());
        println!("  {} to start the console", "leaddesk serve".cyan());
    }

    Ok(())
}
