//! Ordered (pattern → category) tables, evaluated first-match-wins.
//!
//! Tables are data: the built-in ones live in [`builtin`], and a YAML config
//! can replace any of them without code changes.

pub mod builtin;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

pub use builtin::{order_status_rules, product_name_rules};

pub const DEFAULT_FALLBACK: &str = "Other";

/// How a rule's pattern is tested against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Case-insensitive substring.
    #[default]
    Contains,
    /// Case-insensitive regular expression.
    Regex,
}

/// Serialized form of a rule, as written in config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub category: String,
    #[serde(default)]
    pub kind: MatchKind,
}

#[derive(Debug, Clone)]
enum Matcher {
    Contains(String),
    Regex(Regex),
}

#[derive(Debug, Clone)]
pub struct Rule {
    spec: RuleSpec,
    matcher: Matcher,
}

impl Rule {
    pub fn contains(pattern: &str, category: &str) -> Self {
        Self {
            spec: RuleSpec {
                pattern: pattern.to_string(),
                category: category.to_string(),
                kind: MatchKind::Contains,
            },
            matcher: Matcher::Contains(pattern.to_lowercase()),
        }
    }

    pub fn compile(spec: RuleSpec) -> Result<Self> {
        let matcher = match spec.kind {
            MatchKind::Contains => Matcher::Contains(spec.pattern.to_lowercase()),
            MatchKind::Regex => Matcher::Regex(
                RegexBuilder::new(&spec.pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("invalid regex for {:?}", spec.category))?,
            ),
        };
        Ok(Self { spec, matcher })
    }

    pub fn category(&self) -> &str {
        &self.spec.category
    }

    /// `lowered` must already be lower-cased.
    fn matches(&self, lowered: &str) -> bool {
        match &self.matcher {
            Matcher::Contains(needle) => lowered.contains(needle.as_str()),
            Matcher::Regex(re) => re.is_match(lowered),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetSpec {
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

/// A compiled rule table. Deserializes from [`RuleSetSpec`], compiling
/// regex patterns up front.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RuleSetSpec")]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: String,
}

impl TryFrom<RuleSetSpec> for RuleSet {
    type Error = anyhow::Error;

    fn try_from(spec: RuleSetSpec) -> Result<Self> {
        let rules = spec
            .rules
            .into_iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rules,
            fallback: spec.fallback,
        })
    }
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            fallback: default_fallback(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First matching rule's category, or the fallback.
    pub fn classify(&self, input: &str) -> &str {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(Rule::category)
            .unwrap_or(self.fallback.as_str())
    }

    /// Every value [`classify`](Self::classify) can return, in declaration order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.rules.len() + 1);
        for cat in self
            .rules
            .iter()
            .map(Rule::category)
            .chain(std::iter::once(self.fallback.as_str()))
        {
            if !out.contains(&cat) {
                out.push(cat);
            }
        }
        out
    }

    pub fn to_spec(&self) -> RuleSetSpec {
        RuleSetSpec {
            rules: self.rules.iter().map(|r| r.spec.clone()).collect(),
            fallback: self.fallback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let set = RuleSet::new(vec![
            Rule::contains("phone", "Phone"),
            Rule::contains("iphone", "iPhone 14"),
        ]);
        assert_eq!(set.classify("Apple iPhone"), "Phone");
    }

    #[test]
    fn unmatched_falls_back() {
        let set = RuleSet::new(vec![Rule::contains("ship", "Shipped")]);
        assert_eq!(set.classify("lost in transit"), "Other");
        let set = set.with_fallback("Unknown");
        assert_eq!(set.classify(""), "Unknown");
    }

    #[test]
    fn contains_is_case_insensitive() {
        let set = RuleSet::new(vec![Rule::contains("MacBook", "Macbook Pro")]);
        assert_eq!(set.classify("MACBOOK air"), "Macbook Pro");
    }

    #[test]
    fn yaml_rules_with_regex() -> Result<()> {
        let yaml = r#"
rules:
  - pattern: '^re(turn|fund)'
    category: Reversed
    kind: regex
  - pattern: ship
    category: Shipped
fallback: Misc
"#;
        let set: RuleSet = serde_yaml::from_str(yaml)?;
        assert_eq!(set.classify("RETURNED"), "Reversed");
        assert_eq!(set.classify("item returned"), "Misc");
        assert_eq!(set.classify("Shipping"), "Shipped");
        assert_eq!(set.categories(), vec!["Reversed", "Shipped", "Misc"]);
        Ok(())
    }

    #[test]
    fn bad_regex_is_a_load_error() {
        let yaml = "rules:\n  - pattern: '(unclosed'\n    category: X\n    kind: regex\n";
        assert!(serde_yaml::from_str::<RuleSet>(yaml).is_err());
    }

    #[test]
    fn categories_are_deduplicated() {
        let set = RuleSet::new(vec![
            Rule::contains("deliver", "Delivered"),
            Rule::contains("arrived", "Delivered"),
        ]);
        assert_eq!(set.categories(), vec!["Delivered", "Other"]);
    }

    #[test]
    fn rule_specs_recompile() -> Result<()> {
        let set = order_status_rules().clone();
        let again = RuleSet::try_from(set.to_spec())?;
        assert_eq!(again.categories(), set.categories());
        Ok(())
    }
}
