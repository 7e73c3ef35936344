use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;
use tracing::info;

use sentiment_overlay::config::Config;

pub mod commands;

#[derive(Parser)]
#[command(
    name = "sentiment-overlay",
    about = "Daily sentiment-risk overlay for an equity universe",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Env-style configuration file path (defaults to .env)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the overlay and write report artifacts
    Run {
        /// Comma-separated tickers (overrides OVERLAY_TICKERS)
        #[arg(short, long)]
        tickers: Option<String>,

        /// Output directory for artifacts
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seed for mock factor exposures
        #[arg(short, long)]
        seed: Option<u64>,

        /// Load factor exposures from a CSV file instead of the mock generator
        #[arg(short, long)]
        factors: Option<PathBuf>,

        /// Skip the raw headlines artifact
        #[arg(long)]
        no_headlines: bool,

        /// Skip the diagnostic plot
        #[arg(long)]
        no_plot: bool,

        /// Also print the overlay as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Fetch and score the current headlines for one ticker
    Headlines {
        /// Ticker to fetch
        #[arg(short, long, default_value = "AAPL")]
        ticker: String,
    },

    /// Classify a single sentiment/momentum pair
    Classify {
        /// Aggregate sentiment score
        #[arg(short, long, allow_negative_numbers = true)]
        sentiment: f64,

        /// Momentum exposure
        #[arg(short, long, allow_negative_numbers = true)]
        momentum: f64,
    },
}

/// Options of the `run` command after CLI parsing
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub tickers: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub factors: Option<PathBuf>,
    pub no_headlines: bool,
    pub no_plot: bool,
    pub json: bool,
}

/// Execute CLI command with the loaded configuration
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run { tickers, output_dir, seed, factors, no_headlines, no_plot, json } => {
            info!("Running daily overlay");
            let options = RunOptions { tickers, output_dir, seed, factors, no_headlines, no_plot, json };
            commands::run(config, options).await?;
        }
        Commands::Headlines { ticker } => {
            info!("Fetching headlines for {}", ticker);
            commands::headlines(config, ticker).await?;
        }
        Commands::Classify { sentiment, momentum } => {
            commands::classify(&config, sentiment, momentum);
        }
    }
    Ok(())
}
