use anitrack_lib::cli::{self, Cli};
use anitrack_lib::shared::utils::logger::init_logger_with_level;
use anitrack_lib::shared::AppConfig;
use anitrack_lib::AppContext;
use anyhow::{Context, Result};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    init_logger_with_level(level);

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(path) = &cli.settings {
        config.settings_path = path.clone();
    }

    let ctx = AppContext::initialize(config)
        .await
        .context("Failed to initialize")?;

    cli::run(cli, ctx).await
}
