//! Kitty allocator binary
//!
//! Reads a batch of cases, allocates each kitty and writes one JSON report per case.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kitty_runner::{
    load_batch, BatchRunner, JustificationMode, KittyConfig, Pipeline, DEFAULT_INPUT,
    DEFAULT_OUTPUT_DIR,
};

#[derive(Debug, Parser)]
#[command(name = "kitty", version, about = "Split a discount kitty among sales agents")]
struct Args {
    /// JSON file holding the list of cases
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory receiving one report per case
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Seed for template selection (overrides JUSTIFICATION_SEED)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Starting kitty allocator v{}", kitty_common::VERSION);

    // Load configuration
    let mut config = KittyConfig::load().context("Invalid configuration")?;
    if args.seed.is_some() {
        config.justification.seed = args.seed;
    }
    info!("Loaded configuration: {:?}", config);
    if let JustificationMode::External(settings) = &config.justification.mode {
        info!(
            model = %settings.model,
            concurrency = config.justification.concurrency,
            timeout_ms = config.justification.timeout_ms,
            "External justifications enabled"
        );
    }

    let generator = config.generator().context("Invalid configuration")?;
    let cases = load_batch(&args.input).await?;
    info!("Loaded {} cases from {}", cases.len(), args.input.display());

    let runner = BatchRunner::new(Pipeline::new(&config, &generator), &args.output);

    // Dropping the batch future on Ctrl-C cancels in-flight calls; the case
    // being processed is never written.
    let report = tokio::select! {
        report = runner.run(&cases) => report?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping batch");
            bail!("batch interrupted");
        }
    };

    info!(
        "Batch finished: {} written, {} failed",
        report.written.len(),
        report.failures.len()
    );
    if !report.is_success() {
        for failure in &report.failures {
            warn!("Case {} ({}) failed: {}", failure.index, failure.title, failure.reason);
        }
        bail!("{} of {} cases failed", report.failures.len(), report.total());
    }

    Ok(())
}
