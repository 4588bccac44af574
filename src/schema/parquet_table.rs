// src/schema/parquet_table.rs

use anyhow::{Context, Result};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::Path,
};
use tracing::debug;

use crate::record::CleanRecord;
use crate::schema::{
    columns::{batch_to_clean, batch_to_raw, clean_arrow_schema, records_to_batch},
    ReadBatch,
};

const READ_BATCH_SIZE: usize = 8192;

/// Read every row group of a raw-orders Parquet file.
pub fn read_raw_parquet(path: &Path) -> Result<ReadBatch> {
    let file_label = path.display().to_string();
    let file = File::open(path).with_context(|| format!("opening {}", file_label))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata of {}", file_label))?
        .with_batch_size(READ_BATCH_SIZE)
        .build()
        .context("building parquet reader")?;

    let mut out = ReadBatch::default();
    let mut next_row = 1;
    for batch in reader {
        let batch = batch.with_context(|| format!("decoding {}", file_label))?;
        let rows = batch_to_raw(&batch, &file_label, next_row, &mut out.errors)?;
        next_row += batch.num_rows();
        out.records.extend(rows);
    }
    debug!(file = %file_label, rows = next_row - 1, "read parquet");
    Ok(out)
}

/// Write the cleaned table as one Brotli-compressed Parquet file, via a
/// temp file renamed into place.
pub fn write_clean_parquet(path: &Path, records: &[CleanRecord]) -> Result<u64> {
    let schema = clean_arrow_schema();
    let batch = records_to_batch(records)?;

    let tmp = path.with_extension("parquet.tmp");
    let file = File::create(&tmp).with_context(|| format!("creating file {}", tmp.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();
    let mut writer =
        ArrowWriter::try_new(file, schema, Some(props)).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    let metadata = fs::metadata(path).context("getting file metadata")?;
    Ok(metadata.len())
}

/// Read back a cleaned Parquet file.
pub fn read_clean_parquet(path: &Path) -> Result<Vec<CleanRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(READ_BATCH_SIZE)
        .build()?;

    let mut out = Vec::new();
    for batch in reader {
        out.extend(batch_to_clean(&batch?)?);
    }
    Ok(out)
}
