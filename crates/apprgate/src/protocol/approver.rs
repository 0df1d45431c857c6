//! One automatic decision round.
//!
//! 1. List `ING` records.
//! 2. Decide each against the policy set, using the record's embedded descriptor.
//! 3. Send agree/reject for every record that is not skipped.
//!
//! A failed decision call is logged and recorded; the round carries on with
//! the next record. Only a failed listing aborts the round.

use super::ApprovalProtocol;
use apprgate_core::error::CustodyError;
use apprgate_core::types::{ApprovalOutcome, ApprovalStatus, PendingApproval, SIGN_TRANSACTION_SUFFIX};
use apprgate_core::value::Value;
use apprgate_policy::{PolicyDecision, PolicyMatcher};
use std::sync::Arc;

/// A record whose decision could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// The record.
    pub record_id: String,
    /// The decision that was attempted.
    pub decision: PolicyDecision,
    /// What the service said.
    pub error: CustodyError,
}

/// Everything that happened in one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Records decided, in listing order.
    pub outcomes: Vec<ApprovalOutcome>,
    /// Records left pending (no policy matched, or not `ING`).
    pub skipped: Vec<String>,
    /// Records whose decision call failed.
    pub failures: Vec<RecordFailure>,
}

impl RoundReport {
    /// Outcomes that were agreed.
    pub fn approved(&self) -> impl Iterator<Item = &ApprovalOutcome> {
        self.outcomes.iter().filter(|o| o.approved)
    }
}

/// Decides pending records with a [`PolicyMatcher`].
#[derive(Clone)]
pub struct Approver {
    protocol: ApprovalProtocol,
    policies: Arc<dyn PolicyMatcher>,
}

impl std::fmt::Debug for Approver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Approver")
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

impl Approver {
    /// Creates an approver.
    #[must_use]
    pub fn new(protocol: ApprovalProtocol, policies: Arc<dyn PolicyMatcher>) -> Self {
        Self { protocol, policies }
    }

    /// Runs one round.
    ///
    /// # Errors
    ///
    /// Returns the custody error if pending records cannot be listed.
    pub async fn run_round(&self) -> Result<RoundReport, CustodyError> {
        let pending = self.protocol.list_pending().await?;
        let mut report = RoundReport::default();

        tracing::debug!(pending = pending.len(), "approver round started");

        for record in &pending {
            if record.status != ApprovalStatus::Ing {
                report.skipped.push(record.record_id.clone());
                continue;
            }

            let decision = self.policies.decide(&record.tx_info);
            if decision.is_skip() {
                tracing::debug!(record_id = %record.record_id, "no policy matched, leaving pending");
                report.skipped.push(record.record_id.clone());
                continue;
            }

            let agree = decision.is_approved();
            match self.protocol.decide(&record.record_id, agree).await {
                Ok(ack) => {
                    tracing::info!(
                        record_id = %record.record_id,
                        action = %record.action,
                        %decision,
                        "decision applied"
                    );
                    report.outcomes.push(outcome(record, ack.record_id, agree));
                }
                Err(error) => {
                    tracing::error!(
                        record_id = %record.record_id,
                        %decision,
                        %error,
                        "failed to apply decision"
                    );
                    report.failures.push(RecordFailure {
                        record_id: record.record_id.clone(),
                        decision,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            decided = report.outcomes.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "approver round finished"
        );

        Ok(report)
    }
}

fn outcome(record: &PendingApproval, approval_id: String, approved: bool) -> ApprovalOutcome {
    let sign_only = record
        .tx_info
        .get("method")
        .and_then(Value::as_str)
        .is_some_and(|m| m.ends_with(SIGN_TRANSACTION_SUFFIX));

    ApprovalOutcome {
        approval_id,
        approved,
        action: record.action,
        tx_info_json: record.tx_info.to_json().to_string(),
        wallet_id: record.wallet_id.clone(),
        sign_only,
    }
}
