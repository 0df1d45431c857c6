//! # Normalize Command
//!
//! `apprgate normalize --chain <CHAIN> [--intent <INTENT>] <PAYLOAD>` prints the
//! canonical descriptor the initiator would submit for the payload.

use apprgate_chain::{ChainRegistry, Normalizer};
use apprgate_core::config::Config;
use apprgate_core::error::{ApprovalGateError, NormalizeError};
use apprgate_core::types::{CanonicalTxInfo, Intent};

/// The `apprgate normalize` command handler.
#[derive(Debug, Clone)]
pub struct NormalizeCommand {
    /// Chain name.
    pub chain: String,
    /// What the payload is for.
    pub intent: Intent,
    /// Raw payload.
    pub payload: String,
}

impl NormalizeCommand {
    /// Create a new `NormalizeCommand`.
    #[must_use]
    pub fn new(chain: impl Into<String>, intent: Intent, payload: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            intent,
            payload: payload.into(),
        }
    }

    /// Normalizes the payload using the built-in chains plus `config.chains`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] for unknown chains or undecodable payloads.
    pub fn descriptor(&self, config: &Config) -> Result<CanonicalTxInfo, NormalizeError> {
        normalizer(config).normalize(&self.chain, &self.payload, self.intent)
    }

    /// Prints the descriptor as pretty JSON, in the same shape policy rules
    /// see it.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalGateError::Normalize`] if the payload cannot be
    /// normalized.
    pub fn run(&self, config: &Config) -> Result<(), ApprovalGateError> {
        let tx_info = self.descriptor(config)?;
        println!("{:#}", tx_info.to_value().to_json());
        Ok(())
    }
}

/// Builds a normalizer over the built-in chains and the configured extras.
pub(crate) fn normalizer(config: &Config) -> Normalizer {
    Normalizer::new(ChainRegistry::with_extra(&config.chains))
}
