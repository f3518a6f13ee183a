//! Evaluation CLI: score a dense prediction matrix against sparse held-out
//! interactions and report Recall@M.

use anyhow::Context;
use clap::Parser;
use citeval::{
    data::{load_dense_matrix_file, load_sparse_matrix_file},
    eval::{LogProgress, RecallEvaluator},
    Config,
};
use std::path::PathBuf;

/// Recall@M evaluation.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Held-out interactions in sparse adjacency format.
    #[arg(long)]
    ground_truth: PathBuf,

    /// Prediction scores, one whitespace-separated row per line.
    #[arg(long)]
    predictions: PathBuf,

    /// Number of rows (default: dataset.num_users from config.toml).
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns (default: dataset.num_articles from config.toml).
    #[arg(long)]
    cols: Option<usize>,

    /// Cut-off M (default: eval.m from config.toml).
    #[arg(short, long)]
    m: Option<usize>,

    /// Evaluate rows on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Write the full per-row report as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let config = if args.rows.is_none() || args.cols.is_none() || args.m.is_none() {
        Some(Config::load().context("Pass --rows, --cols and -m explicitly or provide a config.toml")?)
    } else {
        None
    };

    let rows = args
        .rows
        .or_else(|| config.as_ref().map(|c| c.dataset.num_users))
        .context("missing --rows")?;
    let cols = args
        .cols
        .or_else(|| config.as_ref().map(|c| c.dataset.num_articles))
        .context("missing --cols")?;
    let mut eval_config = config.map(|c| c.eval).unwrap_or_default();
    if let Some(m) = args.m {
        eval_config.m = m;
    }
    if args.sequential {
        eval_config.parallel = false;
    }

    log::info!("Loading ground truth {} ({}x{})", args.ground_truth.display(), rows, cols);
    let ground_truth = load_sparse_matrix_file(&args.ground_truth, rows, cols)
        .with_context(|| format!("Failed to load {}", args.ground_truth.display()))?;

    log::info!("Loading predictions {}", args.predictions.display());
    let predictions = load_dense_matrix_file(&args.predictions, rows, cols)
        .with_context(|| format!("Failed to load {}", args.predictions.display()))?;

    let evaluator = RecallEvaluator::from_config(&eval_config)?;
    let progress = LogProgress::new(rows, eval_config.progress_every);
    let report = evaluator.evaluate_with(&ground_truth, &predictions, &progress)?;

    println!("\n=== Evaluation Results ===");
    println!("Rows evaluated:  {} of {}", report.eligible_rows, report.rows);
    println!("Recall@{}:       {:.2}%", report.m, report.mean_recall * 100.0);

    if let Some(path) = &args.json {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}
