//! # apprgate-policy
//!
//! Rule evaluation and policy selection for the approval gate.
//!
//! ## Modules
//!
//! - [`path`] - Dotted-path lookup into a value tree
//! - [`rule`] - Evaluation of one rule against a resolved value
//! - [`engine`] - First-match policy selection ([`PolicySet`], [`PolicyDecision`])
//! - [`config`] - Re-exported rule and policy definitions
//!
//! Everything here is pure and `Send + Sync`. Evaluation is fail-closed: a
//! missing path, an unparsable number or a bad regex makes a rule fail, never
//! an error.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod engine;
pub mod path;
pub mod rule;

pub use config::{Policy, Rule, RuleKind};
pub use engine::{PolicyDecision, PolicyMatcher, PolicySet, PolicyWarning};
pub use path::resolve;
pub use rule::{check, evaluate};
