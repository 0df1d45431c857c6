//! The [`ChainNormalizer`] trait implemented once per [`ChainFamily`].
//!
//! A normalizer turns a chain-specific raw transaction or message into a
//! [`CanonicalTxInfo`]. It holds no state; the chain name is passed through so
//! one normalizer serves every chain of its family.
//!
//! # Method Tags
//!
//! | Intent | Method |
//! |---|---|
//! | `SignOnly` | `<prefix>_signTransaction` |
//! | `Send` | [`ChainNormalizer::send_method`] (empty when the family has none) |
//! | `SignMessage` | chosen by [`ChainNormalizer::build_message`] |

use apprgate_core::error::{NormalizeError, NormalizeResult};
use apprgate_core::types::{CanonicalTxInfo, ChainFamily, Intent, SIGN_TRANSACTION_SUFFIX};

/// Builds canonical descriptors for one encoding family.
///
/// Implementations must be `Send + Sync`; they are used through `&'static dyn`
/// references from any task.
pub trait ChainNormalizer: Send + Sync {
    /// The family this normalizer handles.
    fn family(&self) -> ChainFamily;

    /// Method prefix (`solana`, `eth`, `bfc`).
    fn method_prefix(&self) -> &'static str;

    /// Method tag for a broadcast request; empty if the family has no bridged send.
    fn send_method(&self) -> &'static str;

    /// Builds a transaction descriptor from `raw` for `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Decode`] if `raw` is malformed.
    fn build_transaction(
        &self,
        chain: &str,
        raw: &str,
        intent: Intent,
    ) -> NormalizeResult<CanonicalTxInfo>;

    /// Builds a message-signing descriptor from `message` for `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Decode`] if `message` is empty or malformed.
    fn build_message(&self, chain: &str, message: &str) -> NormalizeResult<CanonicalTxInfo>;

    /// Extracts the signed transaction from the raw string a custody service
    /// returns for a sign-only approval. `None` if it has the wrong shape.
    ///
    /// Most families return the raw string itself.
    fn signed_transaction(&self, raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    /// Method tag for a transaction with the given intent.
    fn transaction_method(&self, intent: Intent) -> String {
        match intent {
            Intent::SignOnly => format!("{}{SIGN_TRANSACTION_SUFFIX}", self.method_prefix()),
            Intent::Send | Intent::SignMessage => self.send_method().to_string(),
        }
    }

    /// Builds a message descriptor for [`Intent::SignMessage`], otherwise a
    /// transaction descriptor.
    ///
    /// # Errors
    ///
    /// See [`build_transaction`](Self::build_transaction) and
    /// [`build_message`](Self::build_message).
    fn normalize(&self, chain: &str, raw: &str, intent: Intent) -> NormalizeResult<CanonicalTxInfo> {
        match intent {
            Intent::SignMessage => self.build_message(chain, raw),
            Intent::Send | Intent::SignOnly => self.build_transaction(chain, raw, intent),
        }
    }
}

/// Rejects an empty message before any decoding.
pub(crate) fn require_message(message: &str) -> NormalizeResult<()> {
    if message.is_empty() {
        return Err(NormalizeError::decode("message", "message is empty"));
    }
    Ok(())
}

/// Hex-decodes a message, mapping failures to a decode error.
pub(crate) fn decode_hex_message(message: &str) -> NormalizeResult<Vec<u8>> {
    hex::decode(message)
        .map_err(|e| NormalizeError::decode("hex", format!("invalid hex message: {e}")))
}
