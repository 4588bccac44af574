// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::info;

use crate::rules::{order_status_rules, product_name_rules, RuleSet};

/// Which fields decide that two cleaned rows are duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    /// `(lower(email), cleaned product category)`
    #[default]
    NormalizedProduct,
    /// `(lower(email), lower(raw product_name))`
    RawProduct,
}

/// What to do with a row whose quantity cannot be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityPolicy {
    /// Drop the row and report it.
    #[default]
    Reject,
    /// Keep the row with this quantity, still reporting it.
    Default(i64),
}

/// Everything that shapes a cleaning run. Every key is optional in YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub order_status: RuleSet,
    pub product_name: RuleSet,
    /// Words recognised anywhere in a quantity cell, checked in key order.
    pub quantity_words: BTreeMap<String, i64>,
    /// When set, malformed quantities fall back to this value instead of
    /// rejecting the row.
    pub default_quantity: Option<i64>,
    pub dedup_key: DedupKey,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            order_status: order_status_rules().clone(),
            product_name: product_name_rules().clone(),
            quantity_words: BTreeMap::from([("two".to_string(), 2)]),
            default_quantity: None,
            dedup_key: DedupKey::default(),
        }
    }
}

impl CleanConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let mut cfg: Self = serde_yaml::from_str(text).context("parsing config")?;
        cfg.quantity_words = cfg
            .quantity_words
            .into_iter()
            .map(|(word, n)| (word.to_lowercase(), n))
            .collect();
        Ok(cfg)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg =
            Self::from_yaml_str(&text).with_context(|| format!("loading {}", path.display()))?;
        info!(
            path = %path.display(),
            status_rules = cfg.order_status.rules().len(),
            product_rules = cfg.product_name.rules().len(),
            "loaded config"
        );
        Ok(cfg)
    }

    /// Config file if given, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn quantity_policy(&self) -> QuantityPolicy {
        match self.default_quantity {
            Some(n) => QuantityPolicy::Default(n),
            None => QuantityPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_gives_defaults() -> Result<()> {
        let cfg = CleanConfig::from_yaml_str("{}")?;
        assert_eq!(cfg.dedup_key, DedupKey::NormalizedProduct);
        assert_eq!(cfg.quantity_policy(), QuantityPolicy::Reject);
        assert_eq!(cfg.quantity_words.get("two"), Some(&2));
        assert_eq!(cfg.product_name.classify("iphone"), "iPhone 14");
        Ok(())
    }

    #[test]
    fn partial_override() -> Result<()> {
        let yaml = r#"
dedup_key: raw_product
default_quantity: 1
quantity_words:
  Three: 3
order_status:
  rules:
    - pattern: cancel
      category: Cancelled
"#;
        let cfg = CleanConfig::from_yaml_str(yaml)?;
        assert_eq!(cfg.dedup_key, DedupKey::RawProduct);
        assert_eq!(cfg.quantity_policy(), QuantityPolicy::Default(1));
        assert_eq!(cfg.quantity_words.get("three"), Some(&3));
        assert!(!cfg.quantity_words.contains_key("two"));
        assert_eq!(cfg.order_status.classify("CANCELLED"), "Cancelled");
        assert_eq!(cfg.order_status.classify("delivered"), "Other");
        // untouched table keeps the built-in rules
        assert_eq!(cfg.product_name.classify("pixel"), "Other");
        assert_eq!(cfg.product_name.classify("Google Pixel 8"), "Google Pixel");
        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "dedup_key: normalized_product")?;
        let cfg = CleanConfig::load(Some(f.path()))?;
        assert_eq!(cfg.dedup_key, DedupKey::NormalizedProduct);
        assert!(CleanConfig::load(Some(Path::new("/nonexistent/cfg.yaml"))).is_err());
        Ok(())
    }
}
