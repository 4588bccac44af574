// src/report.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{fs, io::Write, path::Path};

use crate::error::RecordError;
use crate::process::CleanOutcome;

/// JSON summary of one CLI run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub inputs: Vec<String>,
    pub output: String,
    pub rows_read: usize,
    pub rows_written: usize,
    pub dropped_missing_name: usize,
    pub duplicates_removed: usize,
    pub unreadable: Vec<RecordError>,
    pub rejected: Vec<RecordError>,
    pub flagged: Vec<RecordError>,
}

impl RunReport {
    pub fn new(
        started_at: DateTime<Utc>,
        inputs: Vec<String>,
        output: String,
        unreadable: Vec<RecordError>,
        outcome: &CleanOutcome,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            inputs,
            output,
            rows_read: outcome.rows_in + unreadable.len(),
            rows_written: outcome.records.len(),
            dropped_missing_name: outcome.dropped_missing_name,
            duplicates_removed: outcome.duplicates_removed,
            unreadable,
            rejected: outcome.rejected.clone(),
            flagged: outcome.flagged.clone(),
        }
    }

    /// Pretty-printed, written to a temp file then renamed.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
        serde_json::to_writer_pretty(&mut f, self).context("serializing run report")?;
        f.write_all(b"\n")?;
        fs::rename(&tmp, path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp, path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::clean_and_deduplicate;
    use crate::record::RawRecord;
    use tempfile::tempdir;

    #[test]
    fn report_counts_and_error_kinds() -> Result<()> {
        let rows = vec![
            RawRecord {
                order_id: Some("1".into()),
                customer_name: Some("ann".into()),
                quantity: Some("nope".into()),
                ..Default::default()
            },
            RawRecord {
                order_id: Some("2".into()),
                customer_name: None,
                quantity: Some("1".into()),
                ..Default::default()
            },
            RawRecord {
                order_id: Some("3".into()),
                customer_name: Some("bo".into()),
                quantity: Some("1".into()),
                ..Default::default()
            },
        ];
        let outcome = clean_and_deduplicate(&rows);
        let unreadable = vec![RecordError::Unreadable {
            file: "in.csv".into(),
            row: 4,
            message: "bad price".into(),
        }];
        let report = RunReport::new(
            Utc::now(),
            vec!["in.csv".into()],
            "out.csv".into(),
            unreadable,
            &outcome,
        );
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_written, 1);
        assert_eq!(report.dropped_missing_name, 1);

        let dir = tempdir()?;
        let path = dir.path().join("report.json");
        report.write_json(&path)?;
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(json["rejected"][0]["kind"], "malformed_quantity");
        assert_eq!(json["unreadable"][0]["kind"], "unreadable");
        assert_eq!(json["rows_written"], 1);
        Ok(())
    }
}
