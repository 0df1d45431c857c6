//! Opaque-payload normalizer (Benfen, Benfen testnet).
//!
//! Transactions are carried verbatim as a string payload; nothing is decoded.
//!
//! Messages arrive hex-encoded. The signable form is the personal-message
//! digest the wallet signs:
//!
//! ```text
//! blake2b_256([3, 0, 0] || bcs(bytes))
//! ```
//!
//! where `bcs(bytes)` is the ULEB128 length followed by the bytes, and
//! `[3, 0, 0]` is the personal-message intent (scope 3, version 0, app 0).

use crate::chain::{decode_hex_message, require_message, ChainNormalizer};
use apprgate_core::error::{NormalizeError, NormalizeResult};
use apprgate_core::types::{CanonicalTxInfo, ChainFamily, Intent, MessageForms, TransactionType};
use apprgate_core::value::Value;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

const PERSONAL_MESSAGE_INTENT: [u8; 3] = [3, 0, 0];

/// Normalizer for ledgers whose transactions are opaque strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenfenNormalizer;

impl BenfenNormalizer {
    /// Create a new Benfen normalizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the hex digest signed for a personal message.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Decode`] if the message cannot be BCS-encoded.
    pub fn message_digest(message: &[u8]) -> NormalizeResult<String> {
        let encoded = bcs::to_bytes(&message.to_vec())
            .map_err(|e| NormalizeError::decode("bcs", e.to_string()))?;

        let mut hasher = Blake2b256::new();
        hasher.update(PERSONAL_MESSAGE_INTENT);
        hasher.update(&encoded);
        Ok(hex::encode(hasher.finalize()))
    }
}

impl ChainNormalizer for BenfenNormalizer {
    fn family(&self) -> ChainFamily {
        ChainFamily::OpaquePayload
    }

    fn method_prefix(&self) -> &'static str {
        "bfc"
    }

    fn send_method(&self) -> &'static str {
        ""
    }

    fn build_transaction(
        &self,
        chain: &str,
        raw: &str,
        intent: Intent,
    ) -> NormalizeResult<CanonicalTxInfo> {
        if raw.is_empty() {
            return Err(NormalizeError::decode("payload", "transaction data is empty"));
        }

        Ok(CanonicalTxInfo {
            chain: chain.to_string(),
            method: self.transaction_method(intent),
            transaction_type: Some(TransactionType::Native),
            payload: Value::from(raw),
            msg: None,
            recent_block_hash: None,
        })
    }

    fn build_message(&self, chain: &str, message: &str) -> NormalizeResult<CanonicalTxInfo> {
        require_message(message)?;
        let decoded = decode_hex_message(message)?;

        Ok(CanonicalTxInfo {
            chain: chain.to_string(),
            method: "bfc_signMessage".to_string(),
            transaction_type: None,
            payload: Value::empty_map(),
            msg: Some(MessageForms {
                sign_msg: Self::message_digest(&decoded)?,
                message: String::from_utf8_lossy(&decoded).into_owned(),
                original_msg: message.to_string(),
            }),
            recent_block_hash: None,
        })
    }

    /// The service returns a 4-element JSON array; the signed transaction is
    /// the first element of the second entry.
    fn signed_transaction(&self, raw: &str) -> Option<String> {
        let parts: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
        if parts.len() != 4 {
            return None;
        }
        parts
            .get(1)?
            .get(0)?
            .as_str()
            .map(ToString::to_string)
    }
}
