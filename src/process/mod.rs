// src/process/mod.rs
pub mod dedup;
pub mod normalize;
pub mod utils;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::config::{CleanConfig, DedupKey, QuantityPolicy};
use crate::error::RecordError;
use crate::record::{CleanRecord, OrderId, RawRecord};
use dedup::{deduplicate, GroupKey};
use normalize::{
    normalize_country, normalize_name, normalize_product, normalize_quantity, normalize_status,
};
use utils::clean_cell;

/// Result of one cleaning pass.
#[derive(Debug, Default)]
pub struct CleanOutcome {
    /// Surviving records, one per duplicate group, sorted by `order_id`.
    pub records: Vec<CleanRecord>,
    /// Rows excluded because of a per-record error.
    pub rejected: Vec<RecordError>,
    /// Rows kept with a substituted value; the error is kept for reporting.
    pub flagged: Vec<RecordError>,
    /// Rows dropped because the customer name was absent or blank.
    pub dropped_missing_name: usize,
    pub duplicates_removed: usize,
    pub rows_in: usize,
}

enum Step {
    Kept {
        key: GroupKey,
        record: CleanRecord,
        flag: Option<RecordError>,
    },
    MissingName {
        order_id: Option<String>,
    },
    Rejected(RecordError),
}

/// Clean and deduplicate with the built-in rules.
pub fn clean_and_deduplicate(records: &[RawRecord]) -> CleanOutcome {
    clean_with_config(records, &CleanConfig::default())
}

/// Filter → normalise → deduplicate, in one forward pass.
///
/// Per-record failures land in `rejected`/`flagged`; they never stop the
/// other rows from being processed.
#[instrument(level = "info", skip_all, fields(rows = records.len()))]
pub fn clean_with_config(records: &[RawRecord], cfg: &CleanConfig) -> CleanOutcome {
    let steps: Vec<Step> = records
        .par_iter()
        .enumerate()
        .map(|(idx, raw)| clean_record(idx + 1, raw, cfg))
        .collect();

    let mut outcome = CleanOutcome {
        rows_in: records.len(),
        ..Default::default()
    };
    let mut keyed = Vec::with_capacity(steps.len());

    for step in steps {
        match step {
            Step::Kept { key, record, flag } => {
                if let Some(err) = flag {
                    warn!(%err, "kept record with substituted value");
                    outcome.flagged.push(err);
                }
                keyed.push((key, record));
            }
            Step::MissingName { order_id } => {
                debug!(order_id = ?order_id, "dropped: missing customer name");
                outcome.dropped_missing_name += 1;
            }
            Step::Rejected(err) => {
                warn!(%err, kind = err.kind(), "rejected record");
                outcome.rejected.push(err);
            }
        }
    }

    let deduped = deduplicate(keyed);
    outcome.records = deduped.records;
    outcome.duplicates_removed = deduped.removed;

    info!(
        kept = outcome.records.len(),
        duplicates = outcome.duplicates_removed,
        missing_name = outcome.dropped_missing_name,
        rejected = outcome.rejected.len(),
        flagged = outcome.flagged.len(),
        "cleaned"
    );
    outcome
}

fn clean_record(row: usize, raw: &RawRecord, cfg: &CleanConfig) -> Step {
    let Some(customer_name) = normalize_name(raw.customer_name.as_deref()) else {
        return Step::MissingName {
            order_id: raw.order_id.clone(),
        };
    };
    let Some(order_id) = clean_cell(raw.order_id.as_deref()) else {
        return Step::Rejected(RecordError::MissingOrderId { row });
    };

    let (quantity, flag) =
        match normalize_quantity(&order_id, raw.quantity.as_deref(), &cfg.quantity_words) {
            Ok(n) => (n, None),
            Err(err) => match cfg.quantity_policy() {
                QuantityPolicy::Reject => return Step::Rejected(err),
                QuantityPolicy::Default(n) => (n, Some(err)),
            },
        };

    let email = raw.email.clone().unwrap_or_default();
    let product_name = normalize_product(&cfg.product_name, raw.product_name.as_deref());
    let key = match cfg.dedup_key {
        DedupKey::NormalizedProduct => GroupKey::new(&email, &product_name),
        DedupKey::RawProduct => {
            GroupKey::new(&email, raw.product_name.as_deref().unwrap_or_default())
        }
    };

    Step::Kept {
        key,
        record: CleanRecord {
            order_id: OrderId::new(order_id),
            customer_name,
            email,
            product_name,
            quantity,
            price: raw.price,
            country: normalize_country(raw.country.as_deref()),
            order_status: normalize_status(&cfg.order_status, raw.order_status.as_deref()),
        },
        flag,
    }
}
