//! Trust testbed experiment runner.
//!
//! Loads an experiment description from TOML, resolves the evaluation
//! protocol for the configured plugins, runs it, and writes the run record
//! and readings to an output directory.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trustbed_runner::{
    default_config_toml, run, ExperimentConfig, RecordingSubscriber, RunOutcome, RunRecord,
};

/// Command line arguments for the testbed
#[derive(Parser, Debug)]
#[command(name = "trustbed")]
#[command(about = "Evaluates trust models against synthetic scenarios")]
struct Args {
    /// Path to the experiment TOML file
    #[arg(long, default_value = "experiment.toml")]
    config: PathBuf,

    /// Directory the run record and readings are written to
    #[arg(long, default_value = "results")]
    out: PathBuf,

    /// Overrides the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the configured duration
    #[arg(long)]
    ticks: Option<u64>,

    /// Print a default experiment file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return;
    }

    let mut config = if args.config.exists() {
        match ExperimentConfig::from_file(&args.config) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Could not load {}: {}", args.config.display(), error);
                process::exit(1);
            }
        }
    } else {
        println!("No config at {}, using defaults", args.config.display());
        ExperimentConfig::default()
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.duration = ticks;
    }

    println!("Trust Testbed");
    println!("=============");
    println!("Seed: {}", config.seed);
    println!("Duration: {} ticks", config.duration);
    println!();

    let mut protocol = match config.build_protocol() {
        Ok(protocol) => protocol,
        Err(error) => {
            eprintln!("Could not set up the experiment: {}", error);
            process::exit(1);
        }
    };
    println!("Model: {}", protocol.model_name());
    println!("Scenario: {}", protocol.scenario_name());
    println!("Protocol: {}", protocol.name());
    println!();

    let recorder = RecordingSubscriber::new();
    let readings_handle = recorder.readings();

    println!("Running...");
    let outcome = run(protocol.as_mut(), config.duration, vec![Box::new(recorder)]);

    let readings = readings_handle.borrow().clone();
    let record = RunRecord::new(config.seed, protocol.as_ref(), outcome.ticks(), readings);
    if let Err(error) = record.write_all(&args.out) {
        eprintln!("Could not write results: {}", error);
        process::exit(1);
    }

    println!();
    println!("Wrote {}", args.out.join("run.json").display());
    println!("Wrote {}", args.out.join("readings.csv").display());

    match outcome {
        RunOutcome::Completed { ticks } => {
            println!(
                "Run {} complete. {} ticks, {} readings.",
                record.id,
                ticks,
                record.readings.len()
            );
        }
        RunOutcome::Faulted { tick, error } => {
            eprintln!("Run {} aborted at tick {}: {}", record.id, tick, error);
            process::exit(1);
        }
    }
}
