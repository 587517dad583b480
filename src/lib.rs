pub mod cache;
pub mod cli;
pub mod core;
pub mod gateway;
pub mod loader;
pub mod preferences;
pub mod providers;
pub mod store;

use crate::cache::RateCache;
use crate::cli::theme::ThemeAction;
use crate::core::config::AppConfig;
use crate::gateway::RateGateway;
use crate::preferences::Preferences;
use crate::providers::{BcraProvider, GatewayClient};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Run the rate gateway; `bind` overrides `server.bind`.
    Serve { bind: Option<String> },
    Rates { from: String },
    Convert { amount: String, from: String },
    Theme { action: Option<ThemeAction> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("cotiza starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Serve { bind } => {
            let provider = BcraProvider::new(&config.upstream)?;
            let gateway = RateGateway::new(Arc::new(provider));
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            gateway::server::bind_and_serve(&bind, gateway).await
        }
        AppCommand::Rates { from } => run_rates(&config, &from, None).await,
        AppCommand::Convert { amount, from } => run_rates(&config, &from, Some(&amount)).await,
        AppCommand::Theme { action } => {
            let prefs = Preferences::new(store::open_local_store(&config));
            cli::theme::run(&prefs, action).await
        }
    }
}

async fn run_rates(config: &AppConfig, from: &str, amount: Option<&str>) -> Result<()> {
    let local_store = store::open_local_store(config);
    let cache = RateCache::new(Arc::clone(&local_store));
    let theme = Preferences::new(local_store).theme().await;
    let source = GatewayClient::new(&config.client)?;

    cli::rates::run(&source, &cache, theme, from, amount).await
}
