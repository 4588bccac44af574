// src/record.rs

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Order identifier as it appears in the source table.
///
/// Integer ids compare numerically, anything else compares as text, and
/// integer ids always sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_integer(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl Ord for OrderId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for OrderId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<i64> for OrderId {
    fn from(n: i64) -> Self {
        Self::new(n.to_string())
    }
}

/// One row of the raw orders table. Nothing is validated on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<f64>,
    pub country: Option<String>,
    pub order_status: Option<String>,
}

/// One row of the cleaned table, serialized with the output column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub order_id: OrderId,
    #[serde(rename = "new_customer_name")]
    pub customer_name: String,
    pub email: String,
    #[serde(rename = "cleaned_product_name")]
    pub product_name: String,
    #[serde(rename = "cleaned_quantity")]
    pub quantity: i64,
    pub price: Option<f64>,
    pub country: String,
    pub order_status: String,
}

impl CleanRecord {
    /// Map a cleaned row back onto the input shape, e.g. to re-run the
    /// pipeline over its own output.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            order_id: Some(self.order_id.as_str().to_string()),
            customer_name: Some(self.customer_name.clone()),
            email: Some(self.email.clone()),
            product_name: Some(self.product_name.clone()),
            quantity: Some(self.quantity.to_string()),
            price: self.price,
            country: Some(self.country.clone()),
            order_status: Some(self.order_status.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_compare_numerically() {
        assert!(OrderId::from("2") < OrderId::from("10"));
        assert!(OrderId::from(9) < OrderId::from(100));
    }

    #[test]
    fn text_ids_compare_lexicographically() {
        assert!(OrderId::from("A-10") < OrderId::from("A-9"));
        assert!(OrderId::from("abc") < OrderId::from("abd"));
    }

    #[test]
    fn integer_ids_sort_before_text_ids() {
        let mut ids = vec![
            OrderId::from("b"),
            OrderId::from("12"),
            OrderId::from("a"),
            OrderId::from("3"),
        ];
        ids.sort();
        let got: Vec<&str> = ids.iter().map(OrderId::as_str).collect();
        assert_eq!(got, vec!["3", "12", "a", "b"]);
    }

    #[test]
    fn to_raw_keeps_cleaned_values() {
        let rec = CleanRecord {
            order_id: OrderId::from(7),
            customer_name: "Ann Lee".into(),
            email: "ann@x.com".into(),
            product_name: "Macbook Pro".into(),
            quantity: 3,
            price: Some(1999.0),
            country: "Canada".into(),
            order_status: "Shipped".into(),
        };
        let raw = rec.to_raw();
        assert_eq!(raw.order_id.as_deref(), Some("7"));
        assert_eq!(raw.quantity.as_deref(), Some("3"));
        assert_eq!(raw.price, Some(1999.0));
    }
}
