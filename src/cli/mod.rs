mod admin;
mod import;
mod init;
mod inspect;
mod serve;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "leaddesk")]
#[command(about = "Admin console backend for real-estate lead management")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (defaults to ./leaddesk.toml)
    #[arg(long, global = true, env = "LEADDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Show detailed progress
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init(init::InitArgs),

    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Manage admin accounts
    Admin(admin::AdminArgs),

    /// Load SQL dump files into the configured database
    Import(import::ImportArgs),

    /// Show a lead or look up a customer by mobile
    Inspect(inspect::InspectArgs),

    /// Check database connectivity and table sizes
    Status(status::StatusArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let output = OutputConfig {
            json: self.json,
            quiet: self.quiet,
            verbose: self.verbose,
        };
        let config_path = self.config.unwrap_or_else(Config::default_path);

        match self.command {
            Commands::Init(args) => init::run(args, &config_path, output).await,
            Commands::Serve(args) => serve::run(args, &config_path, output).await,
            Commands::Admin(args) => admin::run(args, &config_path, output).await,
            Commands::Import(args) => import::run(args, &config_path, output).await,
            Commands::Inspect(args) => inspect::run(args, &config_path, output).await,
            Commands::Status(args) => status::run(args, &config_path, output).await,
        }
    }
}

/// Output configuration passed to all commands
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}
