#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod args;
pub mod commands;

use agency::domain::config::AppConfig;
use agency::kernel::config::load_config;
use agency_logger::Logger;
use anyhow::{Context, Result};
use args::{Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg: AppConfig =
        load_config(cli.config.as_deref()).context("Configuration is malformed")?;
    cfg.logging.level = if cli.verbose { "debug" } else { "warn" }.to_owned();
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    match cli.command {
        Command::Contact(args) => commands::contact::run(&cfg.client, args).await,
        Command::Generate(args) => commands::generate::run(&cfg.site, &args),
    }
}
