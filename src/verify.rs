// src/verify.rs

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::config::{CleanConfig, DedupKey};
use crate::record::{CleanRecord, OrderId};

/// An invariant a cleaned table breaks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("order {order_id}: product {value:?} is not a known category")]
    UnknownProduct { order_id: OrderId, value: String },

    #[error("order {order_id}: status {value:?} is not a known category")]
    UnknownStatus { order_id: OrderId, value: String },

    #[error("order {order_id}: blank customer name")]
    BlankName { order_id: OrderId },

    #[error("orders {first} and {second} share email {email:?} and product {product:?}")]
    DuplicateGroup {
        first: OrderId,
        second: OrderId,
        email: String,
        product: String,
    },
}

impl Violation {
    pub fn label(&self) -> &'static str {
        match self {
            Violation::UnknownProduct { .. } => "unknown product",
            Violation::UnknownStatus { .. } => "unknown status",
            Violation::BlankName { .. } => "blank customer name",
            Violation::DuplicateGroup { .. } => "duplicate group",
        }
    }

    pub fn tally(violations: &[Violation]) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for v in violations {
            *counts.entry(v.label()).or_default() += 1;
        }
        counts
    }
}

/// Whether group uniqueness can be checked from the cleaned table alone.
/// The raw product spelling is gone after cleaning, so a table deduplicated
/// on it can't be re-grouped.
pub fn checks_groups(cfg: &CleanConfig) -> bool {
    cfg.dedup_key == DedupKey::NormalizedProduct
}

/// Check closed category sets, non-blank names and, when
/// [`checks_groups`] holds, group-key uniqueness (`lower(email)`, product
/// category).
pub fn check_invariants(records: &[CleanRecord], cfg: &CleanConfig) -> Vec<Violation> {
    let check_groups = checks_groups(cfg);
    let products = cfg.product_name.categories();
    let statuses = cfg.order_status.categories();
    let mut seen: HashMap<(String, &str), &OrderId> = HashMap::new();
    let mut out = Vec::new();

    for r in records {
        if !products.contains(&r.product_name.as_str()) {
            out.push(Violation::UnknownProduct {
                order_id: r.order_id.clone(),
                value: r.product_name.clone(),
            });
        }
        if !statuses.contains(&r.order_status.as_str()) {
            out.push(Violation::UnknownStatus {
                order_id: r.order_id.clone(),
                value: r.order_status.clone(),
            });
        }
        if r.customer_name.trim().is_empty() {
            out.push(Violation::BlankName {
                order_id: r.order_id.clone(),
            });
        }
        if !check_groups {
            continue;
        }
        let key = (r.email.to_lowercase(), r.product_name.as_str());
        if let Some(first) = seen.get(&key) {
            out.push(Violation::DuplicateGroup {
                first: (*first).clone(),
                second: r.order_id.clone(),
                email: r.email.clone(),
                product: r.product_name.clone(),
            });
        } else {
            seen.insert(key, &r.order_id);
        }
    }
    out
}
