use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::OutputConfig;
use crate::config::Config;
use crate::storage::MySqlStore;

#[derive(Args)]
pub struct StatusArgs {
    /// Only check connectivity, skip the table counts
    #[arg(long)]
    brief: bool,
}

#[derive(Serialize)]
struct TableCount {
    table: String,
    rows: Option<u64>,
}

#[derive(Serialize)]
struct StatusOutput {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tables: Vec<TableCount>,
}

pub async fn run(args: StatusArgs, config_path: &Path, output: OutputConfig) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let target = format!(
        "{}@{}:{}/{}",
        config.database.user, config.database.host, config.database.port, config.database.name
    );
    let store = MySqlStore::connect(&config.database);

    let reachable = store.ping().await;
    let tables = match (&reachable, args.brief) {
        (Ok(()), false) => store
            .table_counts()
            .await?
            .into_iter()
            .map(|(table, rows)| TableCount {
                table: table.to_string(),
                rows,
            })
            .collect(),
        _ => Vec::new(),
    };
    store.close().await?;

    if output.json {
        let json_output = StatusOutput {
            status: if reachable.is_ok() { "ready" } else { "unreachable" }.to_string(),
            database: target,
            error: reachable.as_ref().err().map(|e| format!("{e:#}")),
            tables,
        };
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    if output.quiet {
        return reachable;
    }

    match &reachable {
        Ok(()) => println!("{} Database {} is reachable", "✓".green(), target.cyan()),
        Err(e) => println!("{} Database {} is unreachable: {:#}", "✗".red(), target.cyan(), e),
    }
    for count in &tables {
        let rows = count
            .rows
            .map(|n| n.to_string())
            .unwrap_or_else(|| "missing".to_string());
        println!("  {:<24} {}", count.table, rows);
    }

    reachable
}
