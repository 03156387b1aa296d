//! AES-128 Conformance Harness CLI.
//!
//! Runs the conformance suite against the behavioural model of the core,
//! prints a summary and exits non-zero if any scenario failed.
//!
//! # Usage
//!
//! ```text
//! aes-conformance --config configs/default.toml --seed 42 --iterations 4
//! aes-conformance --scenario subbytes --scenario key_schedule --verbose
//! aes-conformance --list
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

use aes_conformance::common::{HarnessError, Result};
use aes_conformance::config::HarnessConfig;
use aes_conformance::dut;
use aes_conformance::runner::Runner;
use aes_conformance::scenarios::{self, Scenario};
use aes_conformance::sim::AesCore;

/// Command-line arguments for the conformance harness.
#[derive(Parser, Debug)]
#[command(author, version, about = "AES-128 Core Conformance Harness")]
struct Args {
    /// TOML configuration; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stimulus seed, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Runs of each scenario, overriding the configuration.
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Only run the named scenario. Repeatable.
    #[arg(short, long = "scenario")]
    scenarios: Vec<String>,

    /// List scenario names and exit.
    #[arg(long)]
    list: bool,

    /// Write the report as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!(error = %e, "harness aborted");
            process::exit(2);
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let suite = scenarios::standard_suite();
    if args.list {
        for scenario in &suite {
            println!("{}", scenario.name());
        }
        return Ok(true);
    }

    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.stimulus.seed = Some(seed);
    }
    if let Some(iterations) = args.iterations {
        config.stimulus.iterations = iterations;
    }
    config.validate()?;

    let selected = select(suite, &args.scenarios)?;
    let core = AesCore::new(config.master_key()?)?;
    let mut runner = Runner::new(config, dut::share(core));
    let report = runner.run(&selected);
    report.print();

    if let Some(path) = &args.json {
        report.write_json(path)?;
    }
    Ok(report.all_passed())
}

fn select(suite: Vec<Box<dyn Scenario>>, names: &[String]) -> Result<Vec<Box<dyn Scenario>>> {
    if names.is_empty() {
        return Ok(suite);
    }
    if let Some(unknown) = names
        .iter()
        .find(|n| !suite.iter().any(|s| s.name() == n.as_str()))
    {
        let known: Vec<&str> = suite.iter().map(|s| s.name()).collect();
        return Err(HarnessError::Config(format!(
            "unknown scenario `{}` (known: {})",
            unknown,
            known.join(", ")
        )));
    }
    Ok(suite
        .into_iter()
        .filter(|s| names.iter().any(|n| n == s.name()))
        .collect())
}
