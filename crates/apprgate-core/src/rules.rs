//! Rule and policy definitions.
//!
//! A [`Rule`] compares the value found at a dotted path against an expected
//! string using a [`RuleKind`]. A [`Policy`] pairs `match_rules`, which decide
//! whether the policy governs a descriptor, with `verify_rules`, which decide
//! whether that descriptor is approved.
//!
//! The TOML/JSON field names follow the long-standing config format:
//!
//! ```toml
//! [[policies]]
//! name = "small evm transfers"
//!
//! [[policies.match_rules]]
//! path = "chain"
//! value = "ETH"
//! rule = "exact"
//!
//! [[policies.verify_rules]]
//! path = "payload.value"
//! value = "1000000000000000000"
//! rule = "lte"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a rule.
///
/// Which operators are meaningful depends on the shape of the resolved value:
/// list operators, decimal operators and string operators. Names that are not
/// recognized are preserved as [`RuleKind::Other`]; the evaluator then applies
/// the documented fallback for the value's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleKind {
    /// String equality.
    Exact,
    /// Substring (string) or membership (list).
    Contains,
    /// String prefix.
    Prefix,
    /// String suffix.
    Suffix,
    /// Regular-expression match.
    Regex,
    /// Decimal equality.
    Eq,
    /// Decimal greater-than.
    Gt,
    /// Decimal greater-or-equal.
    Gte,
    /// Decimal less-than.
    Lt,
    /// Decimal less-or-equal.
    Lte,
    /// Inclusive decimal range, expected value `"min,max"`.
    Range,
    /// Exact list length.
    Length,
    /// Minimum list length.
    MinLength,
    /// Maximum list length.
    MaxLength,
    /// List non-membership.
    NotContains,
    /// Unrecognized operator name.
    Other(String),
}

impl RuleKind {
    /// Returns the configuration name of this operator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact => "exact",
            Self::Contains => "contains",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Regex => "regex",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Range => "range",
            Self::Length => "length",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::NotContains => "notContains",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for RuleKind {
    fn from(name: &str) -> Self {
        match name {
            "exact" => Self::Exact,
            "contains" => Self::Contains,
            "prefix" => Self::Prefix,
            "suffix" => Self::Suffix,
            "regex" => Self::Regex,
            "eq" => Self::Eq,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "range" => Self::Range,
            "length" => Self::Length,
            "minLength" => Self::MinLength,
            "maxLength" => Self::MaxLength,
            "notContains" => Self::NotContains,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RuleKind {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<RuleKind> for String {
    fn from(kind: RuleKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single path + expected value + operator comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Dotted path into the descriptor tree; numeric segments index lists.
    pub path: String,
    /// Expected value, interpreted according to `kind`.
    #[serde(rename = "value")]
    pub expected: String,
    /// Comparison operator.
    #[serde(rename = "rule")]
    pub kind: RuleKind,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub fn new(path: impl Into<String>, expected: impl Into<String>, kind: impl Into<RuleKind>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.path, self.kind, self.expected)
    }
}

/// A pair of rule sets: `match_rules` select, `verify_rules` decide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Optional label used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// All must pass for this policy to govern a descriptor.
    #[serde(default)]
    pub match_rules: Vec<Rule>,
    /// All must pass for a governed descriptor to be approved.
    #[serde(default)]
    pub verify_rules: Vec<Rule>,
}

impl Policy {
    /// Creates an unnamed policy.
    #[must_use]
    pub const fn new(match_rules: Vec<Rule>, verify_rules: Vec<Rule>) -> Self {
        Self {
            name: None,
            match_rules,
            verify_rules,
        }
    }

    /// Sets the policy label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label for logs: the configured name, or `#<index>`.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{index}"))
    }
}
