use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod render;

#[cfg(test)]
mod tests;

use cli::Cli;

/// Main entry point for the sales dashboard CLI.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salesdash=info,client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load .env before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
