// src/schema/csv_table.rs

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use std::{fs, io::Read, path::Path};
use tracing::{debug, warn};

use crate::error::RecordError;
use crate::record::{CleanRecord, RawRecord};
use crate::schema::ReadBatch;

/// Parse a raw-orders CSV. The header row must name at least `order_id`;
/// other missing columns read as absent. Rows that fail to decode are
/// reported, not fatal.
pub fn read_raw_csv<R: Read>(reader: R, file: &str) -> Result<ReadBatch> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("reading header row of {}", file))?
        .clone();
    if !headers.iter().any(|h| h == "order_id") {
        bail!("{} has no order_id column (headers: {:?})", file, headers);
    }
    debug!(file, columns = headers.len(), "csv headers");

    let mut batch = ReadBatch::default();
    for (idx, result) in rdr.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(rec) => batch.records.push(rec),
            Err(e) => {
                warn!(file, row = idx + 1, "unreadable csv row: {}", e);
                batch.errors.push(RecordError::Unreadable {
                    file: file.to_string(),
                    row: idx + 1,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(batch)
}

/// Write rows with `serde` column names, atomically via a temp file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut wtr = WriterBuilder::new()
            .has_headers(true)
            .from_path(&tmp)
            .with_context(|| format!("creating {}", tmp.display()))?;
        for row in rows {
            wtr.serialize(row).context("serializing csv row")?;
        }
        wtr.flush().context("flushing csv writer")?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Read back a cleaned CSV.
pub fn read_clean_csv<R: Read>(reader: R, file: &str) -> Result<Vec<CleanRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    rdr.deserialize::<CleanRecord>()
        .enumerate()
        .map(|(idx, r)| r.with_context(|| format!("{} row {}", file, idx + 1)))
        .collect()
}
