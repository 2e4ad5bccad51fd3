use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::OutputConfig;
use crate::config::Config;
use crate::storage::MySqlStore;

#[derive(Args)]
pub struct ImportArgs {
    /// SQL dump files, applied in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Drop and recreate the configured database first
    #[arg(long)]
    reset: bool,
}

#[derive(Serialize)]
struct ImportOutput {
    status: String,
    database: String,
    reset: bool,
    files: Vec<String>,
}

pub async fn run(args: ImportArgs, config_path: &Path, output: OutputConfig) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    // every file is read before the database is touched
    let mut scripts = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if !path.is_file() {
            bail!("SQL file not found: {}", path.display());
        }
        let sql = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        scripts.push((path, sql));
    }

    if args.reset {
        let server = MySqlStore::connect_server(&config.database);
        server.recreate_database(&config.database.name).await?;
        server.close().await?;
        if output.verbose && !output.quiet && !output.json {
            println!("  Recreated database {}", config.database.name);
        }
    }

    let store = MySqlStore::connect(&config.database);
    for (path, sql) in &scripts {
        tracing::info!("Importing {}", path.display());
        store
            .run_script(sql)
            .await
            .with_context(|| format!("Import of {} failed", path.display()))?;
        if output.verbose && !output.quiet && !output.json {
            println!("  Imported {}", path.display());
        }
    }
    store.close().await?;

    if output.json {
        let json_output = ImportOutput {
            status: "imported".to_string(),
            database: config.database.name.clone(),
            reset: args.reset,
            files: args.files.iter().map(|p| p.display().to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    } else if !output.quiet {
        println!(
            "{} Imported {} file(s) into {}",
            "✓".green(),
            scripts.len(),
            config.database.name.cyan()
        );
    }

    Ok(())
}
