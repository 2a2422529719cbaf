//! Classvent Command Line Interface
//!
//! Evaluates classroom observations and inspects the training data and
//! configuration used to do so.

mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use classvent_advisor::{Advisor, AdvisorConfig};
use classvent_classifier::{load_dataset, Dataset};
use classvent_types::{ClimateMode, Observation, WindowState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "classvent")]
#[command(author = "Classvent Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classroom ventilation advisor", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide whether a classroom should be ventilated
    Evaluate(EvaluateCommand),
    /// Show training data statistics and content hash
    Dataset {
        /// CSV training data (defaults to the configured or built-in table)
        #[arg(short, long)]
        dataset: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Number of students (20-35)
    #[arg(long)]
    students: i32,

    /// Lesson duration in minutes (30-60)
    #[arg(long)]
    duration: i32,

    /// Window state: OPEN or CLOSED
    #[arg(long)]
    window: WindowState,

    /// Climate control: COOLING, HEATING or NONE
    #[arg(long)]
    climate: ClimateMode,

    /// Outside temperature in Celsius (-10 to 40)
    #[arg(long, allow_negative_numbers = true)]
    outside_temp: i32,

    /// CSV training data (defaults to the configured or built-in table)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Print the decision as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging.level, cli.verbose)?;
    config.validate();

    match cli.command {
        Commands::Evaluate(cmd) => run_evaluate(cmd, config),
        Commands::Dataset { dataset } => run_dataset(dataset.as_deref(), &config),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AdvisorConfig> {
    let mut config = match path {
        Some(path) => AdvisorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AdvisorConfig::default(),
    };
    config.apply_env_overrides();
    Ok(config)
}

/// Install the global subscriber; `RUST_LOG` takes precedence.
fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn resolve_dataset(flag: Option<&Path>, config: &AdvisorConfig) -> Result<Dataset> {
    match flag.or(config.dataset.path.as_deref()) {
        Some(path) => {
            info!("Loading dataset from: {}", path.display());
            load_dataset(path).with_context(|| format!("Failed to load dataset {}", path.display()))
        }
        None => Ok(Dataset::builtin()),
    }
}

fn run_evaluate(cmd: EvaluateCommand, config: AdvisorConfig) -> Result<()> {
    let dataset = resolve_dataset(cmd.dataset.as_deref(), &config)?;
    let query = Observation::new(
        cmd.students,
        cmd.duration,
        cmd.window,
        cmd.climate,
        cmd.outside_temp,
    );

    let advisor = Advisor::new(config, Arc::new(dataset));
    let decision = advisor
        .evaluate(&query)
        .context("Failed to evaluate observation")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        print!("{}", render::Report(&decision));
    }
    Ok(())
}

fn run_dataset(flag: Option<&Path>, config: &AdvisorConfig) -> Result<()> {
    let dataset = resolve_dataset(flag, config)?;
    let counts = dataset.label_counts();

    println!("Rows: {}", dataset.len());
    println!("Labels: YES={} NO={}", counts.yes, counts.no);
    for range in dataset.numeric_ranges() {
        println!("  {}: min={}, max={}", range.field, range.min, range.max);
    }
    println!("Content hash: {}", dataset.content_hash());
    Ok(())
}
