use anyhow::Result;
use clap::Parser;

use leaddesk::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.run().await
}
