// src/rules/builtin.rs

use once_cell::sync::Lazy;

use super::{Rule, RuleSet};

static ORDER_STATUS: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::contains("deliver", "Delivered"),
        Rule::contains("pend", "Pending"),
        Rule::contains("ship", "Shipped"),
        Rule::contains("return", "Returned"),
        Rule::contains("refund", "Refunded"),
    ])
});

// Order matters: an input naming several products lands in the first one listed.
static PRODUCT_NAME: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::contains("apple watch", "Apple Watch"),
        Rule::contains("google pixel", "Google Pixel"),
        Rule::contains("samsung galaxy", "Samsung Galaxy S22"),
        Rule::contains("iphone", "iPhone 14"),
        Rule::contains("macbook", "Macbook Pro"),
    ])
});

/// Delivered / Pending / Shipped / Returned / Refunded, else Other.
pub fn order_status_rules() -> &'static RuleSet {
    &ORDER_STATUS
}

/// Apple Watch / Google Pixel / Samsung Galaxy S22 / iPhone 14 / Macbook Pro, else Other.
pub fn product_name_rules() -> &'static RuleSet {
    &PRODUCT_NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_categories() {
        let rules = order_status_rules();
        assert_eq!(rules.classify("delivered"), "Delivered");
        assert_eq!(rules.classify("PENDING payment"), "Pending");
        assert_eq!(rules.classify("Shipping soon"), "Shipped");
        assert_eq!(rules.classify("returned to sender"), "Returned");
        assert_eq!(rules.classify("Refund issued"), "Refunded");
        assert_eq!(rules.classify("cancelled"), "Other");
        assert_eq!(
            rules.categories(),
            vec!["Delivered", "Pending", "Shipped", "Returned", "Refunded", "Other"]
        );
    }

    #[test]
    fn product_categories() {
        let rules = product_name_rules();
        assert_eq!(rules.classify("iPhone 13 Pro"), "iPhone 14");
        assert_eq!(rules.classify("Apple iPhone 14"), "iPhone 14");
        assert_eq!(rules.classify("apple watch series 8"), "Apple Watch");
        assert_eq!(rules.classify("Google Pixel 7"), "Google Pixel");
        assert_eq!(rules.classify("SAMSUNG GALAXY s21"), "Samsung Galaxy S22");
        assert_eq!(rules.classify("MacBook Air"), "Macbook Pro");
        assert_eq!(rules.classify("Dell XPS"), "Other");
    }

    #[test]
    fn declaration_order_breaks_ties() {
        assert_eq!(
            product_name_rules().classify("Apple Watch for iPhone"),
            "Apple Watch"
        );
    }

    #[test]
    fn categories_are_fixed_points() {
        for rules in [order_status_rules(), product_name_rules()] {
            for cat in rules.categories() {
                assert_eq!(rules.classify(cat), cat);
            }
        }
    }
}
