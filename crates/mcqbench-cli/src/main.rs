//! MCQ Bench - multiple-choice LLM evaluation CLI
//!
//! The `mcqbench` command runs every enabled model against every enabled
//! system prompt for a number of runs, asking each question of a test set
//! with shuffled questions and options.
//!
//! ## Commands
//!
//! - `run`: Execute the configured trials and print a summary
//! - `sets`: List the test sets available in a questions directory

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mcqbench_core::{
    available_test_sets, format_trial_header, format_trial_outcome, load_config,
    load_question_bank, write_summary_json, Aggregator, HarnessConfig, RunStats, TrialKey,
    TrialObserver,
};
use openai_gateway::{GatewayConfig, OpenAiGateway, DEFAULT_BASE_URL};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "mcqbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multiple-choice accuracy harness for LLMs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled model x prompt x run combination
    Run(RunArgs),

    /// List available test sets
    Sets {
        /// Directory containing questions-<set>.json files
        #[arg(long, default_value = ".")]
        questions_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Harness configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory containing questions-<set>.json files
    #[arg(long, default_value = ".")]
    questions_dir: PathBuf,

    /// Test set to use instead of the configured one
    #[arg(short, long)]
    test_set: Option<String>,

    /// Number of runs per combination instead of the configured one
    #[arg(short, long)]
    runs: Option<u32>,

    /// Write a JSON summary to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// API key for the model endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API root of the OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    mcqbench_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Sets { questions_dir } => cmd_sets(&questions_dir),
    }
}

/// Prints per-trial progress to stdout.
struct ConsoleObserver;

impl TrialObserver for ConsoleObserver {
    fn trial_started(&mut self, key: &TrialKey<'_>) {
        println!("\n{}", format_trial_header(key));
    }

    fn trial_finished(&mut self, stats: &RunStats) {
        println!("{}", format_trial_outcome(stats));
    }
}

/// Apply command-line overrides on top of the file configuration
fn apply_overrides(config: &mut HarnessConfig, args: &RunArgs) {
    if let Some(test_set) = &args.test_set {
        config.test_set = test_set.clone();
    }
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
}

/// Run all trials and print the summary
async fn cmd_run(args: RunArgs) -> Result<()> {
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config {:?}", args.config))?;
    apply_overrides(&mut config, &args);
    config
        .validate()
        .context("Invalid configuration after command-line overrides")?;

    let bank = load_question_bank(&args.questions_dir, &config.test_set)
        .context("Failed to load question bank")?;

    let api_key = args
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .context("No API key configured. Set OPENAI_API_KEY or pass --api-key")?;

    let gateway = OpenAiGateway::new(
        GatewayConfig::new(&args.base_url)
            .with_api_key(api_key)
            .with_timeout(Duration::from_secs(args.timeout_secs)),
    )
    .context("Failed to create model gateway")?;

    println!("Starting LLM Testing with test set: {}\n", config.test_set);
    println!(
        "Testing {} questions from test set: {}",
        bank.len(),
        config.test_set
    );

    let aggregator = Aggregator::new(config, bank);
    let mut rng = StdRng::from_os_rng();
    let summary = aggregator
        .run(&gateway, &mut rng, &mut ConsoleObserver)
        .await;

    println!("\n{}", summary.render().trim_end());

    if let Some(path) = &args.report {
        write_summary_json(path, &summary)
            .with_context(|| format!("Failed to write report {:?}", path))?;
        info!("Wrote summary report to {:?}", path);
    }

    Ok(())
}

/// List test sets found in a directory
fn cmd_sets(questions_dir: &Path) -> Result<()> {
    let sets = available_test_sets(questions_dir)
        .with_context(|| format!("Failed to scan {:?}", questions_dir))?;

    if sets.is_empty() {
        println!("No test sets found in {:?}", questions_dir);
        return Ok(());
    }

    for set in sets {
        println!("{}", set);
    }
    Ok(())
}
