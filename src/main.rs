//main.rs
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::ensure;
use clap::Parser;
use random_baseline::{generate, BaselineConfig, BaselineRun, OutputLayout};
use tracing_subscriber::EnvFilter;

const DEFAULT_ENV_FILTER: &str = "random_baseline=info";

/// Random baseline clustering: assigns random cluster labels with the same
/// number of clusters as in --data.true_labels.
#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Feature matrix; only its row count is used
    #[arg(long = "data.matrix")]
    data_matrix: PathBuf,

    /// Ground-truth labels (first column), `.gz` is decompressed
    #[arg(long = "data.true_labels")]
    data_true_labels: PathBuf,

    /// Directory for the outputs, created if missing
    #[arg(long = "output_dir")]
    output_dir: PathBuf,

    /// Prefix for output file names
    #[arg(long)]
    name: String,

    /// Seed for the random generator
    #[arg(long, default_value_t = BaselineConfig::DEFAULT_SEED)]
    seed: u64,

    /// Output file naming
    #[arg(long, value_enum, default_value_t = OutputLayout::Plain)]
    layout: OutputLayout,
}

fn run(opts: Opts) -> anyhow::Result<BaselineRun> {
    ensure!(!opts.name.is_empty(), "--name must not be empty");
    ensure!(
        !opts.name.contains(std::path::is_separator),
        "--name must not contain a path separator: {:?}",
        opts.name
    );

    let config = BaselineConfig::new(
        opts.data_matrix,
        opts.data_true_labels,
        opts.output_dir,
        opts.name,
    )
    .with_seed(opts.seed)
    .with_layout(opts.layout);

    Ok(generate(&config)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_ENV_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    match run(opts) {
        Ok(done) => {
            println!("Wrote random clustering to {}", done.primary.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[random_baseline] ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
