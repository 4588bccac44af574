use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use ordercleaner::{
    clean_with_config, report::RunReport, schema, CleanConfig, DedupKey, RecordError,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, ValueEnum)]
enum DedupKeyArg {
    NormalizedProduct,
    RawProduct,
}

impl From<DedupKeyArg> for DedupKey {
    fn from(arg: DedupKeyArg) -> Self {
        match arg {
            DedupKeyArg::NormalizedProduct => DedupKey::NormalizedProduct,
            DedupKeyArg::RawProduct => DedupKey::RawProduct,
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalise and deduplicate raw order tables (CSV or Parquet)"
)]
struct Args {
    /// Input files or glob patterns (.csv / .parquet)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<String>,
    /// Output file (.csv / .parquet)
    #[arg(short, long)]
    output: PathBuf,
    /// YAML config with rule tables and policies
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write rejected and flagged rows here (CSV)
    #[arg(long)]
    rejects: Option<PathBuf>,
    /// Write a JSON run summary here
    #[arg(long)]
    report: Option<PathBuf>,
    /// Override the duplicate grouping key
    #[arg(long, value_enum)]
    dedup_key: Option<DedupKeyArg>,
    /// Keep rows with malformed quantities, using this value
    #[arg(long)]
    default_quantity: Option<i64>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ordercleaner=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    let started_at = Utc::now();
    let args = Args::parse();

    // ─── 2) config: file, then CLI overrides ─────────────────────────
    let mut cfg = CleanConfig::load(args.config.as_deref())?;
    if let Some(key) = args.dedup_key {
        cfg.dedup_key = key.into();
    }
    if let Some(n) = args.default_quantity {
        cfg.default_quantity = Some(n);
    }

    // ─── 3) read every input as one batch ────────────────────────────
    let paths = schema::expand_inputs(&args.input)?;
    info!("{} input file(s)", paths.len());
    let batch = schema::read_inputs(&paths)?;

    // ─── 4) clean + dedup ────────────────────────────────────────────
    let outcome = clean_with_config(&batch.records, &cfg);

    // ─── 5) write output, rejects, report ────────────────────────────
    schema::write_clean(&args.output, &outcome.records)?;
    info!(
        rows = outcome.records.len(),
        "wrote {}",
        args.output.display()
    );

    let problems: Vec<RecordError> = batch
        .errors
        .iter()
        .chain(&outcome.rejected)
        .chain(&outcome.flagged)
        .cloned()
        .collect();
    if let Some(path) = &args.rejects {
        schema::write_rejects(path, &problems)?;
        info!(rows = problems.len(), "wrote rejects {}", path.display());
    } else if !problems.is_empty() {
        warn!(
            "{} row(s) rejected or flagged; pass --rejects to keep them",
            problems.len()
        );
    }

    if let Some(path) = &args.report {
        let report = RunReport::new(
            started_at,
            paths.iter().map(|p| p.display().to_string()).collect(),
            args.output.display().to_string(),
            batch.errors,
            &outcome,
        );
        report.write_json(path)?;
        info!("wrote report {}", path.display());
    }

    info!("all done");
    Ok(())
}
