//! HTTP server for the lead console.
//!
//! Serves the JSON API under `/api` and the prebuilt console pages from the
//! configured static directory, behind a cookie session gate.

pub mod error;
pub mod gate;
mod handlers;

pub use handlers::router;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::auth::SessionKeys;
use crate::config::Config;
use crate::leads::Clock;
use crate::storage::{LeadStore, MySqlStore};

/// Shared application state for HTTP handlers
pub struct AppState {
    pub store: Arc<dyn LeadStore>,
    pub sessions: SessionKeys,
    pub config: Config,
    /// Source of "today" for the follow-up views
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Arc<dyn LeadStore>, sessions: SessionKeys, config: Config) -> Self {
        Self {
            store,
            sessions,
            config,
            clock: Clock::Local,
        }
    }
}

/// Run the HTTP server; `port` overrides `server.port`
pub async fn run_server(config: Config, port: Option<u16>) -> Result<()> {
    let sessions = SessionKeys::from_config(&config)?;
    let store = MySqlStore::connect(&config.database);
    if let Err(e) = store.ping().await {
        tracing::warn!("Database not reachable at startup: {:#}", e);
    }

    let addr = format!(
        "{}:{}",
        config.server.bind,
        port.unwrap_or(config.server.port)
    );
    let state = Arc::new(AppState::new(Arc::new(store), sessions, config));
    let app = router(state);

    tracing::info!("Leaddesk HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
