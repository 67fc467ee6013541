use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use parimutuel::adapter::inbound::cli::command::Cli;
use parimutuel::adapter::inbound::cli::output::{self, OutputConfig};
use parimutuel::adapter::inbound::cli::execute;
use parimutuel::error::Error;
use parimutuel::infrastructure::config::settings::Config;

const DEFAULT_CONFIG: &str = "config.toml";

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load config from {DEFAULT_CONFIG}"))?,
        None => Config::from_env().context("invalid configuration")?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    config.init_logging();
    debug!(database = %config.database.url, "Configuration loaded");

    execute(cli.command, &config).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(err) = run(cli).await {
        let code = err
            .downcast_ref::<Error>()
            .map_or("INTERNAL_ERROR", Error::code);
        debug!(code, error = %format!("{err:#}"), "Command failed");
        output::error(code, &format!("{err:#}"));
        std::process::exit(1);
    }
}
