//! Tabular I/O for the raw and cleaned order tables (CSV and Parquet).

pub mod columns;
pub mod csv_table;
pub mod parquet_table;

use anyhow::{anyhow, bail, Context, Result};
use glob::glob;
use serde::Serialize;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::error::RecordError;
use crate::record::{CleanRecord, RawRecord};

pub use columns::{CLEAN_COLUMNS, RAW_COLUMNS};

/// Rows decoded from one or more inputs, plus the rows that could not be.
#[derive(Debug, Default)]
pub struct ReadBatch {
    pub records: Vec<RawRecord>,
    pub errors: Vec<RecordError>,
}

impl ReadBatch {
    pub fn append(&mut self, other: ReadBatch) {
        self.records.extend(other.records);
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(TableFormat::Csv),
            Some("parquet") | Some("pq") => Ok(TableFormat::Parquet),
            _ => Err(anyhow!(
                "unsupported table format for {} (expected .csv or .parquet)",
                path.display()
            )),
        }
    }
}

/// Read one raw-orders file, format chosen by extension.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn read_raw(path: &Path) -> Result<ReadBatch> {
    let batch = match TableFormat::from_path(path)? {
        TableFormat::Csv => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            csv_table::read_raw_csv(BufReader::new(file), &path.display().to_string())?
        }
        TableFormat::Parquet => parquet_table::read_raw_parquet(path)?,
    };
    info!(
        rows = batch.records.len(),
        unreadable = batch.errors.len(),
        "read input"
    );
    Ok(batch)
}

/// Expand glob patterns into a sorted, de-duplicated list of files.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matched: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();
        if matched.is_empty() {
            bail!("No input files found matching '{}'", pattern);
        }
        paths.extend(matched);
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Read every file into one batch so duplicates are found across files.
pub fn read_inputs(paths: &[PathBuf]) -> Result<ReadBatch> {
    let mut all = ReadBatch::default();
    for path in paths {
        all.append(read_raw(path)?);
    }
    Ok(all)
}

/// Write the cleaned table, format chosen by extension.
#[instrument(level = "info", skip(path, records), fields(path = %path.display(), rows = records.len()))]
pub fn write_clean(path: &Path, records: &[CleanRecord]) -> Result<()> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv_table::write_csv(path, records)?,
        TableFormat::Parquet => {
            let bytes = parquet_table::write_clean_parquet(path, records)?;
            info!(bytes, "wrote parquet");
        }
    }
    Ok(())
}

/// Read a cleaned table back, format chosen by extension.
pub fn read_clean(path: &Path) -> Result<Vec<CleanRecord>> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            csv_table::read_clean_csv(BufReader::new(file), &path.display().to_string())
        }
        TableFormat::Parquet => parquet_table::read_clean_parquet(path),
    }
}

#[derive(Serialize)]
struct RejectRow<'a> {
    kind: &'a str,
    order_id: &'a str,
    detail: String,
}

/// One CSV line per rejected or flagged row: `kind, order_id, detail`.
pub fn write_rejects(path: &Path, errors: &[RecordError]) -> Result<()> {
    let rows: Vec<RejectRow> = errors
        .iter()
        .map(|e| RejectRow {
            kind: e.kind(),
            order_id: e.order_id().unwrap_or_default(),
            detail: e.to_string(),
        })
        .collect();
    csv_table::write_csv(path, &rows)
}
