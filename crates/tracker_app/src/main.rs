mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod render;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracker_core::Msg;
use tracker_engine::ReqwestJobApi;
use tracker_logging::tracker_info;

use crate::app::{App, RunMode};
use crate::cli::{Cli, CliCommand};
use crate::config::{Overrides, API_URL_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = config::load(&Overrides {
        config_path: cli.config.clone(),
        api_url: cli.api_url.clone(),
        env_api_url: std::env::var(API_URL_ENV).ok(),
    })?;
    tracker_logging::initialize(cli.log.into(), &config.log_file, config.log_level);
    tracker_info!("Starting job-tracker against {}", config.api.base_url);

    let api = Arc::new(ReqwestJobApi::new(config.api.clone()).context("failed to build HTTP client")?);

    let Some(command) = cli.command else {
        let mut app = App::new(api, &config, RunMode::Interactive, io::stdout());
        app::run_interactive(&mut app, app::spawn_stdin_reader()).await?;
        tracker_info!("Exiting");
        return Ok(ExitCode::SUCCESS);
    };

    let msg = match command {
        CliCommand::List => Msg::RefreshRequested,
        CliCommand::Scrape { company } => Msg::ScrapeClicked(company),
        CliCommand::Cleanup => Msg::CleanupClicked,
    };
    let mut app = App::new(api, &config, RunMode::OneShot, io::stdout());
    let ok = app::run_once(&mut app, msg).await?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
