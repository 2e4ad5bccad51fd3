use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::OutputConfig;
use crate::config::Config;
use crate::storage::mysql::NewAdmin;
use crate::storage::MySqlStore;

#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create an active admin account that can sign in to the console
    Create(CreateArgs),
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    email: String,

    /// Plain-text password; stored as a bcrypt hash
    #[arg(long, env = "LEADDESK_ADMIN_PASSWORD")]
    password: String,

    #[arg(long, default_value = "Admin")]
    fname: String,

    #[arg(long, default_value = "User")]
    lname: String,

    #[arg(long)]
    mobile: Option<String>,
}

#[derive(Serialize)]
struct CreateOutput {
    status: String,
    admin_id: u64,
    email: String,
}

pub async fn run(args: AdminArgs, config_path: &Path, output: OutputConfig) -> Result<()> {
    match args.command {
        AdminCommand::Create(create) => run_create(create, config_path, output).await,
    }
}

async fn run_create(args: CreateArgs, config_path: &Path, output: OutputConfig) -> Result<()> {
    let email = args.email.trim().to_string();
    if email.is_empty() || args.password.is_empty() {
        bail!("Email and password are required");
    }

    let config = Config::load_or_default(config_path)?;
    let store = MySqlStore::connect(&config.database);

    store.ensure_admin_table().await?;
    if store.admin_exists(&email).await? {
        store.close().await?;
        bail!("An admin with email {} already exists", email);
    }

    let password_hash = crate::auth::hash_password(args.password).await?;
    let admin_id = store
        .create_admin(&NewAdmin {
            fname: args.fname,
            lname: args.lname,
            email: email.clone(),
            mobile: args.mobile,
            password_hash,
        })
        .await?;
    store.close().await?;
    tracing::info!("Created admin {} ({})", admin_id, email);

    if output.json {
        let json_output = CreateOutput {
            status: "created".to_string(),
            admin_id,
            email,
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else if !output.quiet {
        println!("{} Created admin {} (id {})", "✓".green(), email.cyan(), admin_id);
    }

    Ok(())
}
