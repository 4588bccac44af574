// src/process/normalize.rs

use std::collections::BTreeMap;

use crate::error::RecordError;
use crate::process::utils::{clean_str, proper_case};
use crate::rules::RuleSet;

/// Status category for a raw status cell. Absent cells fall through to the
/// rule set's fallback.
pub fn normalize_status(rules: &RuleSet, raw: Option<&str>) -> String {
    rules.classify(raw.unwrap_or_default()).to_string()
}

/// Product category for a raw product-name cell.
pub fn normalize_product(rules: &RuleSet, raw: Option<&str>) -> String {
    rules.classify(raw.unwrap_or_default()).to_string()
}

/// Proper-cased name, or `None` when the cell is absent or blank.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    let cleaned = clean_str(raw?);
    if cleaned.is_empty() {
        None
    } else {
        Some(proper_case(&cleaned))
    }
}

pub fn normalize_country(raw: Option<&str>) -> String {
    proper_case(&clean_str(raw.unwrap_or_default()))
}

/// Read a quantity cell.
///
/// A cell containing one of `words` (e.g. "two", "Two pcs") maps to that
/// word's value; anything else must parse as an integer.
pub fn normalize_quantity(
    order_id: &str,
    raw: Option<&str>,
    words: &BTreeMap<String, i64>,
) -> Result<i64, RecordError> {
    let cell = clean_str(raw.unwrap_or_default());
    let lowered = cell.to_lowercase();
    if let Some(n) = words
        .iter()
        .find(|(word, _)| lowered.contains(word.as_str()))
        .map(|(_, n)| *n)
    {
        return Ok(n);
    }
    cell.parse::<i64>()
        .map_err(|_| RecordError::MalformedQuantity {
            order_id: order_id.to_string(),
            value: cell,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{order_status_rules, product_name_rules};

    fn two() -> BTreeMap<String, i64> {
        BTreeMap::from([("two".to_string(), 2)])
    }

    #[test]
    fn textual_two_in_any_case() {
        for raw in ["two", "Two", "TWO", " two units "] {
            assert_eq!(normalize_quantity("1", Some(raw), &two()), Ok(2));
        }
    }

    #[test]
    fn integer_quantities_parse() {
        assert_eq!(normalize_quantity("1", Some("5"), &two()), Ok(5));
        assert_eq!(normalize_quantity("1", Some(" 12 "), &two()), Ok(12));
    }

    #[test]
    fn malformed_quantity_is_an_error_not_zero() {
        let err = normalize_quantity("42", Some("abc"), &two()).unwrap_err();
        assert_eq!(
            err,
            RecordError::MalformedQuantity {
                order_id: "42".into(),
                value: "abc".into()
            }
        );
        assert!(normalize_quantity("42", None, &two()).is_err());
        assert!(normalize_quantity("42", Some("2.5"), &two()).is_err());
    }

    #[test]
    fn missing_name_is_none() {
        assert_eq!(normalize_name(None), None);
        assert_eq!(normalize_name(Some("  ")), None);
        assert_eq!(normalize_name(Some("jane DOE")), Some("Jane Doe".into()));
    }

    #[test]
    fn absent_categories_fall_back() {
        assert_eq!(normalize_status(order_status_rules(), None), "Other");
        assert_eq!(normalize_product(product_name_rules(), None), "Other");
    }

    #[test]
    fn country_is_proper_cased() {
        assert_eq!(normalize_country(Some("united kingdom")), "United Kingdom");
        assert_eq!(normalize_country(None), "");
    }
}
