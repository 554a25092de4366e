use std::{io, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use watch_eval::{
    config::Config,
    services::{
        load_prompt, providers::AnthropicProvider, split_prompt, EvaluationEngine,
        RecommendationService,
    },
    storage::{snapshot, SnapshotStore},
};

#[derive(Parser)]
#[command(name = "watch-eval")]
#[command(about = "Generate watch recommendations and evaluate how well they landed", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the model for recommendations and save them as a new batch
    Recommend,

    /// Rate the newest batch and save an evaluation snapshot
    Evaluate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays the interactive channel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let store = SnapshotStore::new(&config.output_dir);

    match cli.command {
        Commands::Recommend => recommend(&config, &store).await,
        Commands::Evaluate => evaluate(&store),
    }
}

async fn recommend(config: &Config, store: &SnapshotStore) -> anyhow::Result<()> {
    let template = load_prompt(&config.prompt_path)?;
    let prompt = split_prompt(&template)?;

    let provider = AnthropicProvider::from_config(config)?;
    let service = RecommendationService::new(Arc::new(provider));

    service
        .produce(&prompt, store, io::stdout(), snapshot::now)
        .await
        .context("Failed to produce recommendations")?;

    Ok(())
}

fn evaluate(store: &SnapshotStore) -> anyhow::Result<()> {
    EvaluationEngine::new(store)
        .run(io::stdin().lock(), io::stdout(), snapshot::now)
        .context("Evaluation aborted")?;

    Ok(())
}
