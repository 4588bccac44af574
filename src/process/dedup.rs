// src/process/dedup.rs

use std::collections::{hash_map::Entry, HashMap};

use crate::record::CleanRecord;

/// Grouping key for duplicate detection. Both parts are compared lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    email: String,
    product: String,
}

impl GroupKey {
    pub fn new(email: &str, product: &str) -> Self {
        Self {
            email: email.to_lowercase(),
            product: product.to_lowercase(),
        }
    }
}

pub struct Deduplicated {
    /// One record per group, sorted by `order_id`.
    pub records: Vec<CleanRecord>,
    pub removed: usize,
}

/// Keep the record with the smallest `order_id` in every group.
///
/// Equivalent to ranking each group by `order_id` ascending and keeping rank
/// 1. The whole input is materialised before any winner is final. Rows with
/// equal ids keep the one seen first.
pub fn deduplicate<I>(keyed: I) -> Deduplicated
where
    I: IntoIterator<Item = (GroupKey, CleanRecord)>,
{
    let mut winners: HashMap<GroupKey, CleanRecord> = HashMap::new();
    let mut removed = 0;

    for (key, rec) in keyed {
        match winners.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(rec);
            }
            Entry::Occupied(mut slot) => {
                removed += 1;
                if rec.order_id < slot.get().order_id {
                    slot.insert(rec);
                }
            }
        }
    }

    let mut records: Vec<CleanRecord> = winners.into_values().collect();
    records.sort_by(|a, b| a.order_id.cmp(&b.order_id));
    Deduplicated { records, removed }
}
