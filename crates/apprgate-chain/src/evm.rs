//! EVM-family normalizer (ETH, BSC, Polygon, Arbitrum, Optimism, Avalanche, Fantom).
//!
//! Transactions arrive as a JSON object (`from`, `to`, `value`, `data`, `gas`, ...)
//! and become the payload unchanged, with numbers carried as decimal strings.
//!
//! Messages are classified by their first characters:
//!
//! - `0x...` is a hex-encoded personal message; the human-readable form is the
//!   decoded text
//! - `{...}` or `[...]` is EIP-712 typed data, signed with `eth_signTypedData_v4`
//! - anything else is a plain-text personal message

use crate::chain::{decode_hex_message, require_message, ChainNormalizer};
use apprgate_core::error::{NormalizeError, NormalizeResult};
use apprgate_core::types::{CanonicalTxInfo, ChainFamily, Intent, MessageForms, TransactionType};
use apprgate_core::value::Value;

const PERSONAL_SIGN: &str = "personal_sign";
const SIGN_TYPED_DATA: &str = "eth_signTypedData_v4";

/// Normalizer for account-model EVM chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvmNormalizer;

impl EvmNormalizer {
    /// Create a new EVM normalizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `true` if `message` is signed as EIP-712 typed data.
    #[must_use]
    pub fn is_typed_data(message: &str) -> bool {
        !message.starts_with("0x") && (message.starts_with('{') || message.starts_with('['))
    }
}

impl ChainNormalizer for EvmNormalizer {
    fn family(&self) -> ChainFamily {
        ChainFamily::EvmLike
    }

    fn method_prefix(&self) -> &'static str {
        "eth"
    }

    fn send_method(&self) -> &'static str {
        "eth_sendTransaction"
    }

    fn build_transaction(
        &self,
        chain: &str,
        raw: &str,
        intent: Intent,
    ) -> NormalizeResult<CanonicalTxInfo> {
        let json: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| NormalizeError::decode("json", format!("evm transaction: {e}")))?;

        if !json.is_object() {
            return Err(NormalizeError::decode(
                "json",
                "evm transaction must be a JSON object",
            ));
        }

        Ok(CanonicalTxInfo {
            chain: chain.to_string(),
            method: self.transaction_method(intent),
            transaction_type: Some(TransactionType::Native),
            payload: Value::from(json),
            msg: None,
            recent_block_hash: None,
        })
    }

    fn build_message(&self, chain: &str, message: &str) -> NormalizeResult<CanonicalTxInfo> {
        require_message(message)?;

        let (method, human) = if Self::is_typed_data(message) {
            (SIGN_TYPED_DATA, message.to_string())
        } else if let Some(hex_body) = message.strip_prefix("0x") {
            let decoded = decode_hex_message(hex_body)?;
            (PERSONAL_SIGN, String::from_utf8_lossy(&decoded).into_owned())
        } else {
            (PERSONAL_SIGN, message.to_string())
        };

        Ok(CanonicalTxInfo {
            chain: chain.to_string(),
            method: method.to_string(),
            transaction_type: None,
            payload: Value::empty_map(),
            msg: Some(MessageForms {
                sign_msg: message.to_string(),
                message: human,
                original_msg: message.to_string(),
            }),
            recent_block_hash: None,
        })
    }
}
