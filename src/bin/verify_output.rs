// src/bin/verify_output.rs

use anyhow::{Context, Result};
use clap::Parser;
use ordercleaner::{
    schema,
    verify::{check_invariants, checks_groups, Violation},
    CleanConfig,
};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about = "Check a cleaned order table's invariants")]
struct Args {
    /// Cleaned table (.csv / .parquet)
    file: PathBuf,
    /// Config used to produce it, for the category sets
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let cfg = CleanConfig::load(args.config.as_deref())?;
    let records = schema::read_clean(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let violations = check_invariants(&records, &cfg);

    println!("\n{: <25} {:>10}", "Check", "Count");
    println!("{:-<36}", "");
    println!("{: <25} {:>10}", "rows", records.len());
    for (label, n) in Violation::tally(&violations) {
        println!("{: <25} {:>10}", label, n);
    }
    if !checks_groups(&cfg) {
        println!("{: <25} {:>10}", "duplicate group", "skipped");
        info!("dedup_key is raw_product; group uniqueness not checked");
    }

    if violations.is_empty() {
        info!("{} ok", args.file.display());
        return Ok(());
    }
    for v in &violations {
        error!("{}", v);
    }
    exit(1);
}
