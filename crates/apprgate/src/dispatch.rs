//! The signing-dispatch collaborator.
//!
//! Once a record is agreed, the manager role asks the wallet's signing service
//! to act on it. What to ask for depends on the record:
//!
//! | Record | [`SignAction`] |
//! |---|---|
//! | `TRANSACTION_SIGNATURE` | `SignMessage` |
//! | sign-only descriptor | `SignTransaction` |
//! | anything else | `SendTransaction` |

use apprgate_core::error::DispatchError;
use apprgate_core::types::{ActionCategory, ApprovalOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the signing service is asked to do with an agreed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignAction {
    /// Sign and broadcast the transaction.
    SendTransaction,
    /// Sign the transaction without broadcasting it.
    SignTransaction,
    /// Sign a message.
    SignMessage,
}

impl SignAction {
    /// Chooses the action for an approved outcome.
    #[must_use]
    pub fn for_outcome(outcome: &ApprovalOutcome) -> Self {
        if outcome.action == ActionCategory::TransactionSignature {
            Self::SignMessage
        } else if outcome.sign_only {
            Self::SignTransaction
        } else {
            Self::SendTransaction
        }
    }

    /// Endpoint name on the signing service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SendTransaction => "send_transaction",
            Self::SignTransaction => "sign_transaction",
            Self::SignMessage => "sign_message",
        }
    }
}

impl fmt::Display for SignAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchAck {
    /// The approval record that was acted on.
    pub approval_id: String,
    /// The action performed.
    pub action: SignAction,
    /// Whatever the signing service returned (hash, signature, raw transaction).
    pub result: String,
}

/// Asks the signing service to act on an agreed record.
#[async_trait]
pub trait SigningDispatcher: Send + Sync {
    /// Dispatches `action` for `approval_id`.
    async fn dispatch(&self, approval_id: &str, action: SignAction)
        -> Result<DispatchAck, DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(action: ActionCategory, sign_only: bool) -> ApprovalOutcome {
        ApprovalOutcome {
            approval_id: "r1".to_string(),
            approved: true,
            action,
            tx_info_json: "{}".to_string(),
            wallet_id: "w1".to_string(),
            sign_only,
        }
    }

    #[test]
    fn test_message_wins_over_sign_only() {
        let outcome = outcome(ActionCategory::TransactionSignature, true);
        assert_eq!(SignAction::for_outcome(&outcome), SignAction::SignMessage);
    }

    #[test]
    fn test_sign_only_transaction() {
        let outcome = outcome(ActionCategory::TransactionContractInteraction, true);
        assert_eq!(SignAction::for_outcome(&outcome), SignAction::SignTransaction);
    }

    #[test]
    fn test_default_is_send() {
        for action in [
            ActionCategory::Transaction,
            ActionCategory::TransactionContractInteraction,
            ActionCategory::Other,
        ] {
            assert_eq!(
                SignAction::for_outcome(&outcome(action, false)),
                SignAction::SendTransaction
            );
        }
    }

    #[test]
    fn test_endpoint_names() {
        assert_eq!(SignAction::SendTransaction.to_string(), "send_transaction");
        assert_eq!(SignAction::SignTransaction.as_str(), "sign_transaction");
        assert_eq!(SignAction::SignMessage.as_str(), "sign_message");
    }
}
