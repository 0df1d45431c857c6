//! # apprgate
//!
//! Policy-driven approval gate for custodial multi-chain wallets.
//!
//! Raw chain payloads are normalized into a canonical descriptor, submitted to
//! a custody service as approval records, decided by an ordered policy set and,
//! once approved, handed to a signing dispatcher.
//!
//! ## Modules
//!
//! - [`custody`] - The custody service client seam
//! - [`dispatch`] - The signing dispatch seam
//! - [`protocol`] - Submission, polling, result extraction and the approver/manager rounds
//! - [`runner`] - Role-driven round loop with shutdown
//! - [`logging`] - Structured logging setup
//! - [`cli`] - Command-line interface definitions and handlers
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use apprgate::custody::CustodyClient;
//! use apprgate::dispatch::SigningDispatcher;
//! use apprgate::runner::Runner;
//! use apprgate_core::config::Role;
//!
//! # async fn example(
//! #     custody: Arc<dyn CustodyClient>,
//! #     dispatcher: Arc<dyn SigningDispatcher>,
//! # ) -> apprgate_core::Result<()> {
//! let config = apprgate_core::load_config()?;
//! let runner = Runner::new(config, custody, dispatcher)?;
//! let summary = runner.run_once(Role::Approver).await?;
//! println!("{summary:?}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod custody;
pub mod dispatch;
pub mod logging;
pub mod protocol;
pub mod runner;

pub use custody::{CreatedApproval, CustodyClient, CustodyResult, DecisionAck, NewApproval};
pub use dispatch::{DispatchAck, SignAction, SigningDispatcher};
pub use logging::{
    init_logging, new_correlation_id, redact_sensitive, verbosity_to_level, LogConfig, LogError,
    LogFormat, LogGuard, LogLevel,
};
pub use protocol::{ApprovalProtocol, PollSchedule, Submission};
pub use runner::{RoundSummary, Runner};
