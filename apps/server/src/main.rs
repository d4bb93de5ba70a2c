use agency::domain::config::AppConfig;
use agency::domain::constants::CONFIG_PATH_ENV;
use agency::kernel::config::load_config;
use agency_logger::Logger;
use agency_server::Server;
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::var_os(CONFIG_PATH_ENV);
    let cfg: AppConfig =
        load_config(path.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Server::builder().config(cfg).build()?.run().await
}
