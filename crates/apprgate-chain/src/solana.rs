//! Instruction-model normalizer (Solana).
//!
//! Transactions arrive base64-encoded in wire format (legacy or V0 message).
//! The descriptor payload is a one-element list describing the message:
//!
//! ```json
//! [{
//!   "recent_blockhash": "<base58>",
//!   "header": {
//!     "numReadonlySignedAccounts": "0",
//!     "numReadonlyUnsignedAccounts": "1",
//!     "numRequiredSignatures": "1"
//!   },
//!   "staticAccountKeys": ["<base58>", "..."],
//!   "compiledInstructions": [
//!     {"programIdIndex": "2", "accountKeyIndexes": ["0", "1"], "data": "<base64>"}
//!   ],
//!   "addressTableLookups": [
//!     {"accountKey": "<base58>", "writableIndexes": ["0"], "readonlyIndexes": []}
//!   ]
//! }]
//! ```
//!
//! Numbers are carried as decimal strings, so rules can compare them numerically.
//! Messages arrive hex-encoded.

use crate::chain::{decode_hex_message, require_message, ChainNormalizer};
use apprgate_core::error::{NormalizeError, NormalizeResult};
use apprgate_core::types::{CanonicalTxInfo, ChainFamily, Intent, MessageForms, TransactionType};
use apprgate_core::value::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::message::VersionedMessage;
use solana_sdk::transaction::VersionedTransaction;
use std::collections::BTreeMap;

/// Normalizer for the instruction-model family.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaNormalizer;

impl SolanaNormalizer {
    /// Create a new Solana normalizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes a base64 wire-format transaction.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Decode`] for bad base64 or an undecodable transaction.
    pub fn decode(raw: &str) -> NormalizeResult<VersionedTransaction> {
        let bytes = STANDARD
            .decode(raw.trim())
            .map_err(|e| NormalizeError::decode("base64", e.to_string()))?;

        if bytes.is_empty() {
            return Err(NormalizeError::decode("bincode", "empty transaction data"));
        }

        bincode::deserialize(&bytes).map_err(|e| {
            NormalizeError::decode("bincode", format!("failed to decode Solana transaction: {e}"))
        })
    }

    /// Describes a decoded message as a value tree.
    #[must_use]
    pub fn describe(message: &VersionedMessage) -> Value {
        let header = message.header();
        let header = map([
            (
                "numReadonlySignedAccounts",
                number(header.num_readonly_signed_accounts),
            ),
            (
                "numReadonlyUnsignedAccounts",
                number(header.num_readonly_unsigned_accounts),
            ),
            ("numRequiredSignatures", number(header.num_required_signatures)),
        ]);

        let account_keys = message
            .static_account_keys()
            .iter()
            .map(|key| Value::from(key.to_string()))
            .collect::<Vec<_>>();

        let instructions = message
            .instructions()
            .iter()
            .map(|ix| {
                map([
                    ("programIdIndex", number(ix.program_id_index)),
                    ("accountKeyIndexes", numbers(&ix.accounts)),
                    ("data", Value::from(STANDARD.encode(&ix.data))),
                ])
            })
            .collect::<Vec<_>>();

        let lookups = message
            .address_table_lookups()
            .unwrap_or_default()
            .iter()
            .map(|lookup| {
                map([
                    ("accountKey", Value::from(lookup.account_key.to_string())),
                    ("writableIndexes", numbers(&lookup.writable_indexes)),
                    ("readonlyIndexes", numbers(&lookup.readonly_indexes)),
                ])
            })
            .collect::<Vec<_>>();

        map([
            (
                "recent_blockhash",
                Value::from(message.recent_blockhash().to_string()),
            ),
            ("header", header),
            ("staticAccountKeys", Value::List(account_keys)),
            ("compiledInstructions", Value::List(instructions)),
            ("addressTableLookups", Value::List(lookups)),
        ])
    }
}

fn number(n: u8) -> Value {
    Value::from(n.to_string())
}

fn numbers(ns: &[u8]) -> Value {
    Value::List(ns.iter().copied().map(number).collect())
}

fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

impl ChainNormalizer for SolanaNormalizer {
    fn family(&self) -> ChainFamily {
        ChainFamily::InstructionModel
    }

    fn method_prefix(&self) -> &'static str {
        "solana"
    }

    fn send_method(&self) -> &'static str {
        "solana_signAndSendTransaction"
    }

    fn build_transaction(
        &self,
        chain: &str,
        raw: &str,
        intent: Intent,
    ) -> NormalizeResult<CanonicalTxInfo> {
        let tx = Self::decode(raw)?;
        let recent_block_hash = tx.message.recent_blockhash().to_string();

        tracing::debug!(
            chain,
            instructions = tx.message.instructions().len(),
            signatures = tx.signatures.len(),
            "decoded solana transaction"
        );

        Ok(CanonicalTxInfo {
            chain: chain.to_string(),
            method: self.transaction_method(intent),
            transaction_type: Some(TransactionType::Contract),
            payload: Value::List(vec![Self::describe(&tx.message)]),
            msg: None,
            recent_block_hash: Some(recent_block_hash),
        })
    }

    fn build_message(&self, chain: &str, message: &str) -> NormalizeResult<CanonicalTxInfo> {
        require_message(message)?;
        let decoded = decode_hex_message(message)?;

        Ok(CanonicalTxInfo {
            chain: chain.to_string(),
            method: "solana_signMessage".to_string(),
            transaction_type: None,
            payload: Value::empty_map(),
            msg: Some(MessageForms {
                sign_msg: message.to_string(),
                message: String::from_utf8_lossy(&decoded).into_owned(),
                original_msg: message.to_string(),
            }),
            recent_block_hash: None,
        })
    }
}
