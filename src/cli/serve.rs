use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::OutputConfig;
use crate::config::Config;

#[derive(Args)]
pub struct ServeArgs {
    /// HTTP port (overrides server.port)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Directory with the console's static assets (overrides server.static_dir)
    #[arg(long)]
    static_dir: Option<String>,
}

pub async fn run(args: ServeArgs, config_path: &Path, _output: OutputConfig) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(dir) = args.static_dir {
        config.server.static_dir = dir;
    }
    crate::http::run_server(config, args.port).await
}
