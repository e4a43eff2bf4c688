use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hive_core::Settings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hive")]
#[command(about = "hive - fan a request out to concurrent LLM worker agents")]
#[command(version)]
pub struct Cli {
    /// LLM model to use
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-worker timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Classify the request and hand it to a single specialist
    Supervise { prompt: String },
    /// Ask every specialist concurrently, then build a consensus
    Swarm { prompt: String },
    /// Time sequential vs concurrent fan-out over the specialists
    Compare { prompt: String },
    /// Run the built-in sample prompts through supervisor and swarm
    Demo,
}

impl Cli {
    /// Settings from the config file with command line overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Settings::load(),
        };

        if let Some(ref model) = self.model {
            settings.llm.model = model.clone();
        }
        if let Some(ref base_url) = self.base_url {
            settings.llm.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout {
            settings.dispatch.worker_timeout_secs = Some(secs);
        }

        Ok(settings)
    }
}
