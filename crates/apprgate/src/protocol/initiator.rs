//! Initiator entry points.
//!
//! Each call normalizes its input, opens an approval record for the configured
//! wallet and blocks (asynchronously) until the record is decided. Failures are
//! returned immediately; nothing is retried.

use super::ApprovalProtocol;
use apprgate_core::error::Result;
use apprgate_core::types::{CanonicalTxInfo, Intent};

/// Submits transactions and messages for one wallet.
#[derive(Debug, Clone)]
pub struct Initiator {
    protocol: ApprovalProtocol,
    wallet_id: String,
}

impl Initiator {
    /// Creates an initiator for `wallet_id`.
    #[must_use]
    pub fn new(protocol: ApprovalProtocol, wallet_id: impl Into<String>) -> Self {
        Self {
            protocol,
            wallet_id: wallet_id.into(),
        }
    }

    /// The wallet submissions are made for.
    #[must_use]
    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }

    /// Signs and broadcasts `raw` on `chain`; returns the transaction hash.
    ///
    /// # Errors
    ///
    /// Normalization, custody and protocol errors.
    pub async fn send_transaction(&self, chain: &str, raw: &str) -> Result<String> {
        self.submit_raw(chain, raw, Intent::Send).await
    }

    /// Signs `raw` on `chain` without broadcasting; returns the signed transaction.
    ///
    /// # Errors
    ///
    /// Normalization, custody and protocol errors.
    pub async fn sign_transaction(&self, chain: &str, raw: &str) -> Result<String> {
        self.submit_raw(chain, raw, Intent::SignOnly).await
    }

    /// Signs `message` on `chain`; returns the signature.
    ///
    /// # Errors
    ///
    /// Normalization, custody and protocol errors.
    pub async fn sign_message(&self, chain: &str, message: &str) -> Result<String> {
        self.submit_raw(chain, message, Intent::SignMessage).await
    }

    /// Submits an already-built descriptor.
    ///
    /// # Errors
    ///
    /// Custody and protocol errors, or an unsupported chain.
    pub async fn send_tx_info(&self, tx_info: &CanonicalTxInfo, intent: Intent) -> Result<String> {
        self.protocol
            .submit_and_wait(&self.wallet_id, tx_info, intent)
            .await
    }

    async fn submit_raw(&self, chain: &str, raw: &str, intent: Intent) -> Result<String> {
        let tx_info = self.protocol.normalizer().normalize(chain, raw, intent)?;
        self.send_tx_info(&tx_info, intent).await
    }
}

/// Intent implied by a descriptor built elsewhere (e.g. loaded from configuration).
#[must_use]
pub fn implied_intent(tx_info: &CanonicalTxInfo) -> Intent {
    if tx_info.is_message() {
        Intent::SignMessage
    } else if tx_info.is_sign_only() {
        Intent::SignOnly
    } else {
        Intent::Send
    }
}
