//! Fuzz target for rule evaluation.
//!
//! Builds a small policy set and a descriptor tree from fuzzer input and
//! decides it. Evaluation must never panic, whatever the operator, expected
//! value or path.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run policy_rules
//! ```

#![no_main]

use std::collections::BTreeMap;

use apprgate_core::rules::{Policy, Rule, RuleKind};
use apprgate_core::value::Value;
use apprgate_policy::{check, PolicyDecision, PolicyMatcher, PolicySet};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

const OPERATORS: [&str; 16] = [
    "exact", "contains", "prefix", "suffix", "regex", "eq", "gt", "gte", "lt", "lte", "range",
    "length", "minLength", "maxLength", "notContains", "startsWith",
];

#[derive(Debug, Arbitrary)]
enum TreeInput {
    Leaf(String),
    List(Vec<String>),
    Map(Vec<(String, String)>),
}

#[derive(Debug, Arbitrary)]
struct RuleInput {
    path: String,
    expected: String,
    operator: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    fields: Vec<(String, TreeInput)>,
    match_rules: Vec<RuleInput>,
    verify_rules: Vec<RuleInput>,
}

impl TreeInput {
    fn into_value(self) -> Value {
        match self {
            Self::Leaf(s) => Value::String(s),
            Self::List(items) => Value::List(items.into_iter().map(Value::String).collect()),
            Self::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
        }
    }
}

impl RuleInput {
    fn into_rule(self) -> Rule {
        let operator = OPERATORS[usize::from(self.operator) % OPERATORS.len()];
        Rule::new(self.path, self.expected, RuleKind::from(operator))
    }
}

fuzz_target!(|input: FuzzInput| {
    let tree: BTreeMap<String, Value> = input
        .fields
        .into_iter()
        .map(|(k, v)| (k, v.into_value()))
        .collect();
    let tree = Value::Map(tree);

    let match_rules: Vec<Rule> = input.match_rules.into_iter().map(RuleInput::into_rule).collect();
    let verify_rules: Vec<Rule> = input.verify_rules.into_iter().map(RuleInput::into_rule).collect();

    let all_match = match_rules.iter().all(|r| check(&tree, r));
    let set = PolicySet::new(vec![Policy::new(match_rules, verify_rules)]);
    let _ = set.validate();

    match set.decide(&tree) {
        PolicyDecision::Skip => assert!(!all_match),
        PolicyDecision::Approve { policy } | PolicyDecision::Reject { policy, .. } => {
            assert!(all_match);
            assert_eq!(policy, 0);
        }
    }
});
