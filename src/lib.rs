pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::commands::Request;
use crate::core::Controller;
use crate::core::config::{AppConfig, Secrets};
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

pub enum AppCommand {
    Run(Request),
    Shell,
}

/// Loads settings and secrets and wires the controller to the live API.
pub fn build_controller(
    config_path: Option<&str>,
    env_file: Option<&str>,
) -> Result<Controller<ExchangeRateApiProvider>> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let secrets = Secrets::load(env_file.map(Path::new))?;
    let provider = ExchangeRateApiProvider::new(&config.api, secrets.api_key()?)?;

    Ok(Controller::new(provider, secrets.admin, &config.messages))
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    env_file: Option<&str>,
) -> Result<()> {
    info!("xrate starting...");
    let mut controller = build_controller(config_path, env_file)?;

    match command {
        AppCommand::Run(request) => cli::commands::run(&mut controller, request).await,
        AppCommand::Shell => cli::shell::run(&mut controller).await,
    }
}
