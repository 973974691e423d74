mod config;
mod logging;
mod render;
mod runner;

use std::path::PathBuf;

use anyhow::Context;
use catalog_logging::catalog_info;

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let config = config::load_or_default(&path).context("loading configuration")?;
    logging::initialize(config.log_destination);
    catalog_info!("Starting catalog dashboard (demo={})", config.demo);

    let engine_config = config.engine_config().context("building dashboard queries")?;
    let mut runner = runner::DashboardRunner::new(engine_config)?;
    let view = runner.refresh_and_wait(config.settle_timeout());

    print!("{}", render::render(&view, &chrono::Utc::now().to_rfc3339()));
    Ok(())
}
