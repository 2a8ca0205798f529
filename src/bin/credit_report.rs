//! Command-line entry point for credit case reports.
//!
//! Reads one credit case (documents, portfolio, reserve history, stress scenarios, debts)
//! as JSON and writes the combined report as JSON.
//!
//! Usage:
//!   credit_report --input case.json [--config engine.json] [--seed N] [--scenarios N]
//!                 [--appetite A] [--output report.json]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use debtrisk::config::EngineConfig;
use debtrisk::pipeline::{CreditCase, RunOptions, run_case};
use debtrisk::valuation::DEFAULT_SCENARIOS;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "credit_report")]
#[command(version, about = "Score, provision, and value a credit case")]
struct Cli {
    /// Credit case JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Engine configuration JSON (defaults to the built-in tables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base seed for debt simulations
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Monte Carlo scenarios per debt
    #[arg(long, default_value_t = DEFAULT_SCENARIOS)]
    scenarios: usize,

    /// Risk appetite in [0, 1] used for price recommendations
    #[arg(long, default_value_t = 0.5)]
    appetite: f64,

    /// Report destination (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::DEFAULT,
    };
    let case: CreditCase = serde_json::from_str(&fs::read_to_string(&cli.input)?)?;
    tracing::info!(input = %cli.input.display(), debts = case.debts.len(), "loaded credit case");

    let options = RunOptions {
        seed: cli.seed,
        n_scenarios: cli.scenarios,
        risk_appetite: cli.appetite,
    };
    let report = run_case(&case, &config, options)?;
    let json = serde_json::to_string_pretty(&report)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            tracing::info!(output = %path.display(), "report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
