//! Traffic Risk Pipeline - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipeline::{init_logging, Pipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "traffic-risk", version, about = "Trajectory to incident-risk feature pipeline")]
struct Cli {
    /// Camera configuration file (JSON or TOML)
    #[arg(long, global = true, value_name = "PATH", default_value = "camera_config.json")]
    config: PathBuf,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the windowed signal table from the track table
    Timeseries,
    /// Label the signal table and build rolling features
    Features,
    /// Run every stage
    Run,
    /// Show the stored window nearest to a time
    Inspect {
        /// Target time in seconds
        #[arg(long, value_name = "SEC")]
        at: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    info!("=== Traffic Risk Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    let pipeline = Pipeline::new(config)?;

    match cli.command {
        Command::Timeseries => {
            pipeline.run_timeseries().context("Time-series stage failed")?;
        }
        Command::Features => {
            pipeline.run_features().context("Feature stage failed")?;
        }
        Command::Run => {
            pipeline.run().context("Pipeline run failed")?;
        }
        Command::Inspect { at } => {
            let assessment = pipeline.inspect(at).context("Inspection failed")?;
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
    }

    Ok(())
}
