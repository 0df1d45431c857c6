//! First-match policy selection.
//!
//! # Decision Order
//!
//! 1. Walk the policies in order; the first whose match rules all pass is selected.
//!    Later policies are not evaluated.
//! 2. No policy selected: [`PolicyDecision::Skip`]; the record is left pending.
//! 3. Selected: every verify rule must pass for [`PolicyDecision::Approve`],
//!    otherwise [`PolicyDecision::Reject`] names the first failing rule.
//!    An empty verify list approves.
//!
//! # Example
//!
//! ```
//! use apprgate_core::rules::{Policy, Rule, RuleKind};
//! use apprgate_core::value::Value;
//! use apprgate_policy::engine::{PolicyDecision, PolicyMatcher, PolicySet};
//!
//! let set = PolicySet::new(vec![Policy::new(
//!     vec![Rule::new("chain", "ETH", RuleKind::Exact)],
//!     vec![Rule::new("payload.value", "100", RuleKind::Lte)],
//! )]);
//!
//! let tx = Value::from(serde_json::json!({"chain": "ETH", "payload": {"value": "5"}}));
//! assert_eq!(set.decide(&tx), PolicyDecision::Approve { policy: 0 });
//! ```

use crate::rule::check;
use apprgate_core::rules::{Policy, Rule, RuleKind};
use apprgate_core::value::Value;
use regex::Regex;
use std::fmt;

/// Decides agree, reject or skip for a descriptor tree.
///
/// Implementations must be `Send + Sync` so one matcher can serve a whole run.
pub trait PolicyMatcher: Send + Sync {
    /// Decides the descriptor `tree`.
    fn decide(&self, tree: &Value) -> PolicyDecision;
}

/// Outcome of matching a descriptor against a policy set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyDecision {
    /// No policy's match rules all passed.
    Skip,
    /// Policy `policy` matched and all its verify rules passed.
    Approve {
        /// Index of the selected policy.
        policy: usize,
    },
    /// Policy `policy` matched and verify rule `failed_rule` failed.
    Reject {
        /// Index of the selected policy.
        policy: usize,
        /// Index of the first failing verify rule.
        failed_rule: usize,
    },
}

impl PolicyDecision {
    /// Index of the selected policy, if any.
    #[must_use]
    pub const fn matched(&self) -> Option<usize> {
        match self {
            Self::Skip => None,
            Self::Approve { policy } | Self::Reject { policy, .. } => Some(*policy),
        }
    }

    /// `true` only for [`PolicyDecision::Approve`].
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approve { .. })
    }

    /// `true` for [`PolicyDecision::Skip`].
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Approve { policy } => write!(f, "approve (policy #{policy})"),
            Self::Reject {
                policy,
                failed_rule,
            } => write!(f, "reject (policy #{policy}, verify rule #{failed_rule})"),
        }
    }
}

/// Something a [`PolicySet::validate`] pass found worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyWarning {
    /// Policy label.
    pub policy: String,
    /// Offending rule.
    pub rule: Rule,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "policy {}: rule `{}`: {}", self.policy, self.rule, self.message)
    }
}

/// An ordered, immutable list of policies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySet {
    policies: Vec<Policy>,
}

impl PolicySet {
    /// Wraps an ordered list of policies.
    #[must_use]
    pub const fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    /// The policies, in evaluation order.
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Number of policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// `true` if there are no policies; every descriptor is then skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Reports rules that can never pass.
    ///
    /// Evaluation is fail-closed, so these are warnings rather than errors: an
    /// uncompilable regex or an unknown operator on a list simply never passes.
    #[must_use]
    pub fn validate(&self) -> Vec<PolicyWarning> {
        let mut warnings = Vec::new();

        for (index, policy) in self.policies.iter().enumerate() {
            let rules = policy.match_rules.iter().chain(&policy.verify_rules);
            for rule in rules {
                let message = match &rule.kind {
                    _ if rule.path.is_empty() => Some("empty path".to_string()),
                    RuleKind::Regex => Regex::new(&rule.expected)
                        .err()
                        .map(|e| format!("invalid regex: {e}")),
                    RuleKind::Other(name) => Some(format!(
                        "unknown operator `{name}`, falls back to exact/eq and never passes on lists"
                    )),
                    _ => None,
                };

                if let Some(message) = message {
                    warnings.push(PolicyWarning {
                        policy: policy.label(index),
                        rule: rule.clone(),
                        message,
                    });
                }
            }
        }

        warnings
    }
}

impl From<Vec<Policy>> for PolicySet {
    fn from(policies: Vec<Policy>) -> Self {
        Self::new(policies)
    }
}

impl PolicyMatcher for PolicySet {
    fn decide(&self, tree: &Value) -> PolicyDecision {
        let selected = self
            .policies
            .iter()
            .enumerate()
            .find(|(_, p)| p.match_rules.iter().all(|r| check(tree, r)));

        let Some((index, policy)) = selected else {
            tracing::debug!("no policy matched");
            return PolicyDecision::Skip;
        };

        let failed = policy
            .verify_rules
            .iter()
            .enumerate()
            .find(|(_, r)| !check(tree, r));

        let decision = match failed {
            Some((failed_rule, rule)) => {
                tracing::debug!(policy = %policy.label(index), %rule, "verify rule failed");
                PolicyDecision::Reject {
                    policy: index,
                    failed_rule,
                }
            }
            None => PolicyDecision::Approve { policy: index },
        };

        tracing::debug!(policy = %policy.label(index), %decision, "policy decided");
        decision
    }
}
