//! Single-rule evaluation.
//!
//! The operator set depends on the shape of the resolved value:
//!
//! | Resolved value | Operators | Unknown operator |
//! |---|---|---|
//! | list | `length`, `minLength`, `maxLength`, `contains`, `notContains` | `false` |
//! | decimal string | `eq`, `gt`, `gte`, `lt`, `lte`, `range` | `eq` |
//! | other string | `exact`, `contains`, `prefix`, `suffix`, `regex` | `exact` |
//! | map, or not found | - | `false` |
//!
//! Evaluation never fails: anything that cannot be parsed or compiled is `false`.

use crate::path::resolve;
use apprgate_core::rules::{Rule, RuleKind};
use apprgate_core::value::Value;
use bigdecimal::BigDecimal;
use regex::Regex;
use std::cmp::Ordering;
use std::str::FromStr;

/// Resolves `rule.path` in `tree` and evaluates the rule against the result.
#[must_use]
pub fn check(tree: &Value, rule: &Rule) -> bool {
    evaluate(resolve(tree, &rule.path), rule)
}

/// Evaluates `rule` against an already resolved value.
#[must_use]
pub fn evaluate(resolved: Option<&Value>, rule: &Rule) -> bool {
    match resolved {
        Some(Value::List(items)) => check_list(items, &rule.expected, &rule.kind),
        Some(Value::String(actual)) => match parse_decimal(actual) {
            Some(actual) => check_decimal(&actual, &rule.expected, &rule.kind),
            None => check_string(actual, &rule.expected, &rule.kind),
        },
        Some(Value::Map(_)) | None => false,
    }
}

/// A decimal operand with its sign and order of magnitude precomputed, so
/// comparisons between far-apart exponents never rescale to a common one.
struct Decimal {
    value: BigDecimal,
    sign: Ordering,
    magnitude: i64,
}

impl Decimal {
    fn compare(&self, other: &Self) -> Ordering {
        let by_sign = self.sign.cmp(&other.sign);
        if by_sign.is_ne() || self.sign.is_eq() {
            return by_sign;
        }

        match self.magnitude.cmp(&other.magnitude) {
            // Same magnitude means the scales differ by at most the digit count.
            Ordering::Equal => self.value.cmp(&other.value),
            by_magnitude if self.sign.is_lt() => by_magnitude.reverse(),
            by_magnitude => by_magnitude,
        }
    }
}

/// Parses `s` as `[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?` with an exponent
/// that fits in 32 bits. Anything else is a plain string.
fn parse_decimal(s: &str) -> Option<Decimal> {
    if !is_decimal_literal(s) {
        return None;
    }

    let value = BigDecimal::from_str(s).ok()?;
    let (coefficient, scale) = value.as_bigint_and_exponent();
    let coefficient = coefficient.to_string();
    let digits = coefficient.trim_start_matches('-');

    let sign = if digits == "0" {
        Ordering::Equal
    } else if coefficient.starts_with('-') {
        Ordering::Less
    } else {
        Ordering::Greater
    };
    let magnitude = i64::try_from(digits.len()).ok()?.checked_sub(scale)?;

    Some(Decimal {
        value,
        sign,
        magnitude,
    })
}

fn is_decimal_literal(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let (mantissa, exponent) = match s.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (s, None),
    };

    let unsigned = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return false;
    }

    match exponent {
        Some(exp) => {
            let body = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !body.is_empty() && all_digits(body) && exp.parse::<i32>().is_ok()
        }
        None => true,
    }
}

fn check_list(items: &[Value], expected: &str, kind: &RuleKind) -> bool {
    let contains = || items.iter().any(|item| item.as_str() == Some(expected));
    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);

    match kind {
        RuleKind::Length => expected.parse::<i64>().is_ok_and(|n| len == n),
        RuleKind::MinLength => expected.parse::<i64>().is_ok_and(|n| len >= n),
        RuleKind::MaxLength => expected.parse::<i64>().is_ok_and(|n| len <= n),
        RuleKind::Contains => contains(),
        RuleKind::NotContains => !contains(),
        _ => false,
    }
}

fn check_decimal(actual: &Decimal, expected: &str, kind: &RuleKind) -> bool {
    if *kind == RuleKind::Range {
        return in_range(actual, expected);
    }

    let Some(expected) = parse_decimal(expected) else {
        return false;
    };

    let ord = actual.compare(&expected);
    match kind {
        RuleKind::Gt => ord.is_gt(),
        RuleKind::Gte => ord.is_ge(),
        RuleKind::Lt => ord.is_lt(),
        RuleKind::Lte => ord.is_le(),
        _ => ord.is_eq(),
    }
}

/// Inclusive `"min,max"` bounds; any other shape is `false`.
fn in_range(actual: &Decimal, expected: &str) -> bool {
    let parts: Vec<&str> = expected.split(',').collect();
    let [min, max] = parts.as_slice() else {
        return false;
    };

    match (parse_decimal(min), parse_decimal(max)) {
        (Some(min), Some(max)) => actual.compare(&min).is_ge() && actual.compare(&max).is_le(),
        _ => false,
    }
}

fn check_string(actual: &str, expected: &str, kind: &RuleKind) -> bool {
    match kind {
        RuleKind::Contains => actual.contains(expected),
        RuleKind::Prefix => actual.starts_with(expected),
        RuleKind::Suffix => actual.ends_with(expected),
        RuleKind::Regex => Regex::new(expected).is_ok_and(|re| re.is_match(actual)),
        _ => actual == expected,
    }
}
