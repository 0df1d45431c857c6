//! Core data types shared by the normalizer, the policy engine and the protocol.
//!
//! - [`ChainFamily`] - The three encoding families a chain name can belong to
//! - [`Intent`] - What the initiator wants done with a payload
//! - [`CanonicalTxInfo`] - Chain-agnostic descriptor submitted for approval
//! - [`PendingApproval`] - A custody-service approval record
//! - [`ActionCategory`] - Coarse classification driving expiry and result extraction
//! - [`ApprovalOutcome`] - The result of one automatic decision
//!
//! # Examples
//!
//! ```
//! use apprgate_core::types::{ActionCategory, CanonicalTxInfo, Intent, TransactionType};
//! use apprgate_core::value::Value;
//!
//! let tx = CanonicalTxInfo {
//!     chain: "ETH".to_string(),
//!     method: "eth_sendTransaction".to_string(),
//!     transaction_type: Some(TransactionType::Native),
//!     payload: Value::empty_map(),
//!     msg: None,
//!     recent_block_hash: None,
//! };
//!
//! let action = ActionCategory::for_submission(&tx, Intent::Send);
//! assert_eq!(action, ActionCategory::Transaction);
//! assert_eq!(action.expiry_seconds(), 0);
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Expiry applied to contract-interaction and sign-only approvals.
pub const CONTRACT_INTERACTION_EXPIRY_SECS: u32 = 300;

/// Method suffix marking a sign-only (not broadcast) transaction.
pub const SIGN_TRANSACTION_SUFFIX: &str = "_signTransaction";

/// Encoding family of a chain.
///
/// Each family has exactly one normalizer; adding a chain name to an existing
/// family is a registry entry, adding a family is a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainFamily {
    /// Account/instruction-model VM (Solana): binary transactions with compiled instructions.
    InstructionModel,
    /// Account-model EVM chains: transactions arrive as JSON descriptors.
    EvmLike,
    /// Ledgers whose transaction payload is carried as an opaque string (Benfen).
    OpaquePayload,
}

impl ChainFamily {
    /// Returns the configuration name of this family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InstructionModel => "instruction_model",
            Self::EvmLike => "evm_like",
            Self::OpaquePayload => "opaque_payload",
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instruction_model" => Ok(Self::InstructionModel),
            "evm_like" => Ok(Self::EvmLike),
            "opaque_payload" => Ok(Self::OpaquePayload),
            other => Err(format!("unknown chain family: {other}")),
        }
    }
}

/// What the initiator wants done with a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Sign and broadcast the transaction.
    #[default]
    Send,
    /// Sign the transaction and hand back the signed payload without broadcasting.
    SignOnly,
    /// Sign an arbitrary message.
    SignMessage,
}

impl Intent {
    /// Returns the snake-case name of this intent.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::SignOnly => "sign_only",
            Self::SignMessage => "sign_message",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction classification carried in the canonical descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Plain native transfer or chain-native transaction.
    Native,
    /// Contract or program interaction.
    Contract,
}

impl TransactionType {
    /// Returns the wire name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Contract => "contract",
        }
    }
}

/// The three forms of a message-signing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageForms {
    /// The exact bytes (hex) or text the signer signs.
    pub sign_msg: String,
    /// Human-readable rendering shown to approvers.
    pub message: String,
    /// The message as the initiator supplied it.
    pub original_msg: String,
}

/// Chain-agnostic descriptor submitted to the custody service for approval.
///
/// Produced once by a chain normalizer and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTxInfo {
    /// Chain name as known to the custody service (e.g. `"Solana"`, `"ETH"`).
    pub chain: String,
    /// Bridging/signing method tag; empty for non-bridged native sends.
    #[serde(default)]
    pub method: String,
    /// Transaction classification; absent for message-signing requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Chain-specific transaction body.
    #[serde(default)]
    pub payload: Value,
    /// Message-signing forms, present only for message requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<MessageForms>,
    /// Recent blockhash, for instruction-model chains.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_block_hash: Option<String>,
}

impl CanonicalTxInfo {
    /// Returns `true` if this descriptor carries a message to sign.
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.msg.as_ref().is_some_and(|m| !m.sign_msg.is_empty())
    }

    /// Returns `true` if the method marks a sign-only transaction.
    #[must_use]
    pub fn is_sign_only(&self) -> bool {
        self.method.ends_with(SIGN_TRANSACTION_SUFFIX)
    }

    /// Builds the value tree that policy rules are evaluated against.
    ///
    /// Keys mirror the serialized descriptor: `chain`, `method`, `transactionType`,
    /// `payload`, `msg.{signMsg,message,originalMsg}` and `recentBlockHash`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("chain".to_string(), Value::from(self.chain.as_str()));
        map.insert("method".to_string(), Value::from(self.method.as_str()));
        if let Some(tx_type) = self.transaction_type {
            map.insert("transactionType".to_string(), Value::from(tx_type.as_str()));
        }
        map.insert("payload".to_string(), self.payload.clone());
        if let Some(msg) = &self.msg {
            let mut forms = BTreeMap::new();
            forms.insert("signMsg".to_string(), Value::from(msg.sign_msg.as_str()));
            forms.insert("message".to_string(), Value::from(msg.message.as_str()));
            forms.insert("originalMsg".to_string(), Value::from(msg.original_msg.as_str()));
            map.insert("msg".to_string(), Value::Map(forms));
        }
        if let Some(hash) = &self.recent_block_hash {
            map.insert("recentBlockHash".to_string(), Value::from(hash.as_str()));
        }
        Value::Map(map)
    }
}

/// Status of an approval record on the custody service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalStatus {
    /// Still waiting for approvers.
    #[default]
    Ing,
    /// Approved.
    Agree,
    /// Rejected.
    Reject,
    /// Any status this crate does not interpret (expired, cancelled, ...).
    #[serde(other)]
    Unknown,
}

impl ApprovalStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ing => "ING",
            Self::Agree => "AGREE",
            Self::Reject => "REJECT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of an approval record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionCategory {
    /// Plain transfer, no expiry.
    #[default]
    Transaction,
    /// Contract interaction or sign-only transaction, with an expiry.
    TransactionContractInteraction,
    /// Message signature.
    TransactionSignature,
    /// Any other category reported by the service.
    #[serde(other)]
    Other,
}

impl ActionCategory {
    /// Derives the category for a new submission.
    ///
    /// Sign-only intents and contract transactions are contract interactions;
    /// descriptors carrying a message are signatures; everything else is a
    /// plain transaction.
    #[must_use]
    pub fn for_submission(tx_info: &CanonicalTxInfo, intent: Intent) -> Self {
        if intent == Intent::SignOnly
            || tx_info.is_sign_only()
            || tx_info.transaction_type == Some(TransactionType::Contract)
        {
            Self::TransactionContractInteraction
        } else if tx_info.is_message() {
            Self::TransactionSignature
        } else {
            Self::Transaction
        }
    }

    /// Expiry in seconds to request for this category; `0` means none.
    #[must_use]
    pub const fn expiry_seconds(self) -> u32 {
        match self {
            Self::TransactionContractInteraction => CONTRACT_INTERACTION_EXPIRY_SECS,
            _ => 0,
        }
    }

    /// Returns the wire name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "TRANSACTION",
            Self::TransactionContractInteraction => "TRANSACTION_CONTRACT_INTERACTION",
            Self::TransactionSignature => "TRANSACTION_SIGNATURE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An approval record as reported by the custody service.
///
/// Observed read-only; it only changes through a decision the service applies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    /// Record identifier.
    pub record_id: String,
    /// Current status.
    pub status: ApprovalStatus,
    /// Chain name.
    #[serde(default)]
    pub chain: String,
    /// Action category.
    #[serde(default)]
    pub action: ActionCategory,
    /// Wallet the record belongs to.
    #[serde(default)]
    pub wallet_id: String,
    /// The embedded canonical descriptor, as echoed by the service.
    #[serde(default)]
    pub tx_info: Value,
    /// Transaction hash or signature once resolved.
    #[serde(default)]
    pub tx_hash: String,
    /// Service-specific extra data (`customData`, `authorization`, ...).
    #[serde(default)]
    pub extra_data: Value,
}

/// The result of deciding one pending record.
///
/// Created by the approver round and consumed by signing dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    /// Record id acknowledged by the service.
    pub approval_id: String,
    /// Whether the record was agreed.
    pub approved: bool,
    /// Action category of the record.
    pub action: ActionCategory,
    /// The embedded descriptor rendered as JSON.
    pub tx_info_json: String,
    /// Wallet the record belongs to.
    pub wallet_id: String,
    /// `true` when the descriptor's method marks a sign-only transaction.
    pub sign_only: bool,
}
