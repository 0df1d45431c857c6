//! # apprgate-core
//!
//! Core types, configuration and error definitions shared by the `apprgate` crates.
//!
//! ## Modules
//!
//! - [`value`] - Schema-less value tree that rules address by dotted path
//! - [`types`] - Canonical descriptors, approval records and classifications
//! - [`rules`] - Rule and policy definitions
//! - [`error`] - Error types and result aliases
//! - [`config`] - Configuration structures
//! - [`config_loader`] - Reading and writing `~/.apprgate/config.toml`
//!
//! ## Error Handling
//!
//! ```rust
//! use apprgate_core::error::{ApprovalGateError, ProtocolError};
//!
//! let err: ApprovalGateError = ProtocolError::timeout("rec-1", 15).into();
//! assert_eq!(err.exit_code(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod config_loader;
pub mod error;
pub mod rules;
pub mod types;
pub mod value;

pub use error::{
    ApprovalGateError, ConfigError, CustodyError, DispatchError, NormalizeError, ProtocolError,
    Result,
};

pub use config::{Config, ConfigBuilder, CustodyConfig, PollConfig, Role, RunnerConfig};

pub use config_loader::{expand_path, load_config, ConfigLoader};

pub use rules::{Policy, Rule, RuleKind};

pub use types::{
    ActionCategory, ApprovalOutcome, ApprovalStatus, CanonicalTxInfo, ChainFamily, Intent,
    MessageForms, PendingApproval, TransactionType,
};

pub use value::Value;
