//! Policy configuration types.
//!
//! Re-exports the rule and policy definitions from [`apprgate_core::rules`] so
//! policy code can name them without reaching into the core crate.
//!
//! # Examples
//!
//! ```
//! use apprgate_policy::config::{Policy, Rule, RuleKind};
//!
//! let policy = Policy::new(
//!     vec![Rule::new("chain", "Solana", RuleKind::Exact)],
//!     vec![Rule::new("payload.0.compiledInstructions", "4", RuleKind::MaxLength)],
//! )
//! .with_name("solana");
//!
//! assert_eq!(policy.label(0), "solana");
//! ```

pub use apprgate_core::rules::{Policy, Rule, RuleKind};
