//! A decision round followed by signing dispatch.
//!
//! Every agreed outcome is handed to the [`SigningDispatcher`]; see
//! [`SignAction::for_outcome`] for which action is requested. A dispatch
//! failure is recorded against its record and never stops the round.

use super::{Approver, RoundReport};
use crate::dispatch::{DispatchAck, SignAction, SigningDispatcher};
use apprgate_core::error::{CustodyError, DispatchError};
use std::sync::Arc;

/// A dispatch that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    /// The agreed record.
    pub approval_id: String,
    /// What was requested.
    pub action: SignAction,
    /// Why it failed.
    pub error: DispatchError,
}

/// Everything that happened in one manager round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerReport {
    /// The underlying decision round.
    pub round: RoundReport,
    /// Successful dispatches.
    pub dispatched: Vec<DispatchAck>,
    /// Failed dispatches.
    pub failures: Vec<DispatchFailure>,
}

/// Decides pending records and dispatches the agreed ones for signing.
#[derive(Clone)]
pub struct Manager {
    approver: Approver,
    dispatcher: Arc<dyn SigningDispatcher>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("approver", &self.approver)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Creates a manager.
    #[must_use]
    pub fn new(approver: Approver, dispatcher: Arc<dyn SigningDispatcher>) -> Self {
        Self {
            approver,
            dispatcher,
        }
    }

    /// Runs one decision round, then dispatches every agreed outcome.
    ///
    /// # Errors
    ///
    /// Returns the custody error if the decision round cannot list records.
    pub async fn run_round(&self) -> Result<ManagerReport, CustodyError> {
        let round = self.approver.run_round().await?;
        let mut dispatched = Vec::new();
        let mut failures = Vec::new();

        for outcome in round.approved() {
            let action = SignAction::for_outcome(outcome);
            match self.dispatcher.dispatch(&outcome.approval_id, action).await {
                Ok(ack) => {
                    tracing::info!(
                        approval_id = %outcome.approval_id,
                        %action,
                        result = %ack.result,
                        "signed"
                    );
                    dispatched.push(ack);
                }
                Err(error) => {
                    tracing::error!(
                        approval_id = %outcome.approval_id,
                        %action,
                        %error,
                        "sign dispatch failed"
                    );
                    failures.push(DispatchFailure {
                        approval_id: outcome.approval_id.clone(),
                        action,
                        error,
                    });
                }
            }
        }

        Ok(ManagerReport {
            round,
            dispatched,
            failures,
        })
    }
}
