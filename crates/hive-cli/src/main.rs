use anyhow::Result;
use clap::Parser;
use hive_cli::{app, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    tracing::debug!(model = %settings.llm.model, "settings loaded");

    app::run(&settings, cli.command).await
}
