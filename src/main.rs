use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod output;

#[cfg(test)]
mod test_utils;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.global.config.as_deref())?;
    cli.global.apply(&mut config);

    // Initialize tracing. Logs go to stderr so command output stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("VendorConnect starting up");
    if config.session_file.is_none() {
        output::print_warning("No config directory found; the session will not be kept between runs");
    }

    cli.run(config).await
}
