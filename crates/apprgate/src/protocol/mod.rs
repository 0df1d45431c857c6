//! The submit-then-poll approval protocol.
//!
//! A submission moves through `PENDING -> {AGREE, REJECT, TIMEOUT}`. `AGREE`
//! and `REJECT` are observed on the custody service; `TIMEOUT` is local and
//! means the poll budget ran out.
//!
//! ## Module Structure
//!
//! - [`ApprovalProtocol`] - submit, poll, list and decide over a [`CustodyClient`]
//! - [`extract`] - result extraction from an agreed record
//! - [`initiator`] - Initiator entry points (send, sign, sign message)
//! - [`approver`] - One automatic decision round
//! - [`manager`] - A decision round followed by signing dispatch
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use apprgate::custody::CustodyClient;
//! use apprgate::protocol::{ApprovalProtocol, PollSchedule};
//! use apprgate_chain::Normalizer;
//! use apprgate_core::types::Intent;
//!
//! # async fn demo(custody: Arc<dyn CustodyClient>) -> apprgate_core::Result<()> {
//! let protocol = ApprovalProtocol::new(custody, Normalizer::default(), PollSchedule::default());
//! let tx_info = protocol
//!     .normalizer()
//!     .normalize("ETH", r#"{"to":"0x01","value":"1"}"#, Intent::Send)?;
//! let hash = protocol.submit_and_wait("wallet-1", &tx_info, Intent::Send).await?;
//! println!("{hash}");
//! # Ok(())
//! # }
//! ```

pub mod approver;
pub mod extract;
pub mod initiator;
pub mod manager;

pub use approver::{Approver, RecordFailure, RoundReport};
pub use extract::extract_result;
pub use initiator::{implied_intent, Initiator};
pub use manager::{DispatchFailure, Manager, ManagerReport};

use crate::custody::{CustodyClient, DecisionAck, NewApproval};
use apprgate_chain::Normalizer;
use apprgate_core::config::PollConfig;
use apprgate_core::error::{CustodyError, ProtocolError, ProtocolResult, Result};
use apprgate_core::types::{
    ActionCategory, ApprovalStatus, CanonicalTxInfo, ChainFamily, Intent, PendingApproval,
};
use std::sync::Arc;
use std::time::Duration;

/// A record opened on the custody service, waiting to be polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Id to poll under.
    pub origin_id: String,
    /// Action category the record was opened with.
    pub action: ActionCategory,
    /// Effective intent; `SignOnly` whenever the descriptor's method is sign-only.
    pub intent: Intent,
    /// Encoding family of the descriptor's chain.
    pub family: ChainFamily,
}

/// How often and how long to poll for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Number of lookups before giving up.
    pub max_attempts: u32,
    /// Pause after each lookup that finds the record still pending.
    pub interval: Duration,
}

impl PollSchedule {
    /// Creates a schedule.
    #[must_use]
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// A schedule with no pause between attempts.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::from(&PollConfig::default())
    }
}

impl From<&PollConfig> for PollSchedule {
    fn from(config: &PollConfig) -> Self {
        Self::new(config.max_attempts, config.interval())
    }
}

/// Drives approval records on the custody service.
#[derive(Clone)]
pub struct ApprovalProtocol {
    custody: Arc<dyn CustodyClient>,
    normalizer: Normalizer,
    schedule: PollSchedule,
}

impl std::fmt::Debug for ApprovalProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalProtocol")
            .field("normalizer", &self.normalizer)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl ApprovalProtocol {
    /// Creates a protocol driver.
    #[must_use]
    pub fn new(custody: Arc<dyn CustodyClient>, normalizer: Normalizer, schedule: PollSchedule) -> Self {
        Self {
            custody,
            normalizer,
            schedule,
        }
    }

    /// The normalizer used to resolve chain families.
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The poll schedule.
    #[must_use]
    pub const fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    /// The custody client.
    #[must_use]
    pub fn custody(&self) -> &Arc<dyn CustodyClient> {
        &self.custody
    }

    /// Opens an approval record for `tx_info`.
    ///
    /// A descriptor whose chain is not registered is submitted as
    /// [`ChainFamily::EvmLike`].
    ///
    /// # Errors
    ///
    /// Returns the custody error if the record cannot be created.
    pub async fn submit(
        &self,
        wallet_id: &str,
        tx_info: &CanonicalTxInfo,
        intent: Intent,
    ) -> Result<Submission> {
        let family = self.normalizer.registry().family_of(&tx_info.chain).unwrap_or_else(|| {
            tracing::debug!(chain = %tx_info.chain, "unregistered chain, extracting as evm_like");
            ChainFamily::EvmLike
        });
        let intent = if tx_info.is_sign_only() {
            Intent::SignOnly
        } else {
            intent
        };
        let action = ActionCategory::for_submission(tx_info, intent);

        let request = NewApproval {
            wallet_id: wallet_id.to_string(),
            action,
            tx_info: tx_info.clone(),
            note: String::new(),
            expiry_seconds: action.expiry_seconds(),
        };

        tracing::info!(
            wallet_id,
            chain = %tx_info.chain,
            %action,
            expiry_seconds = request.expiry_seconds,
            "submitting approval"
        );

        let created = self.custody.create_approval(request).await?;

        tracing::debug!(record_id = %created.origin_record_id, "approval created");

        Ok(Submission {
            origin_id: created.origin_record_id,
            action,
            intent,
            family,
        })
    }

    /// Polls until the record is agreed or rejected, or the schedule runs out.
    ///
    /// Returns the extracted result of an agreed record.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Rejected`] as soon as the record is rejected
    /// - [`ProtocolError::Timeout`] if it is still pending after every attempt
    /// - [`ProtocolError::ResultExtraction`] if it was agreed without a usable result
    /// - [`ProtocolError::Custody`] immediately on a service failure
    pub async fn poll(&self, submission: &Submission) -> ProtocolResult<String> {
        let record_id = submission.origin_id.as_str();

        for attempt in 1..=self.schedule.max_attempts {
            let records = self.custody.get_approvals_by_record(record_id).await?;

            for record in records.iter().filter(|r| r.record_id == record_id) {
                match record.status {
                    ApprovalStatus::Agree => {
                        tracing::info!(record_id, attempt, "approval agreed");
                        return extract_result(record, submission);
                    }
                    ApprovalStatus::Reject => {
                        tracing::info!(record_id, attempt, "approval rejected");
                        return Err(ProtocolError::rejected(record_id));
                    }
                    ApprovalStatus::Ing | ApprovalStatus::Unknown => {}
                }
            }

            tracing::debug!(record_id, attempt, "approval still pending");

            if attempt < self.schedule.max_attempts && !self.schedule.interval.is_zero() {
                tokio::time::sleep(self.schedule.interval).await;
            }
        }

        tracing::warn!(record_id, attempts = self.schedule.max_attempts, "approval timed out");
        Err(ProtocolError::timeout(record_id, self.schedule.max_attempts))
    }

    /// Submits `tx_info` and waits for its result.
    ///
    /// # Errors
    ///
    /// See [`submit`](Self::submit) and [`poll`](Self::poll).
    pub async fn submit_and_wait(
        &self,
        wallet_id: &str,
        tx_info: &CanonicalTxInfo,
        intent: Intent,
    ) -> Result<String> {
        let submission = self.submit(wallet_id, tx_info, intent).await?;
        Ok(self.poll(&submission).await?)
    }

    /// Records awaiting a decision.
    ///
    /// # Errors
    ///
    /// Returns the custody error if the listing fails.
    pub async fn list_pending(&self) -> std::result::Result<Vec<PendingApproval>, CustodyError> {
        self.custody.list_approvals(ApprovalStatus::Ing).await
    }

    /// Agrees or rejects a pending record.
    ///
    /// # Errors
    ///
    /// Returns the custody error if the decision is not accepted.
    pub async fn decide(
        &self,
        record_id: &str,
        agree: bool,
    ) -> std::result::Result<DecisionAck, CustodyError> {
        self.custody.set_decision(record_id, agree).await
    }
}
