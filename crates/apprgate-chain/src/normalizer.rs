//! Chain-name dispatch onto the per-family normalizers.
//!
//! [`Normalizer`] is the entry point the protocol uses: it looks the chain up
//! in a [`ChainRegistry`] and hands the payload to the family's
//! [`ChainNormalizer`].
//!
//! # Example
//!
//! ```
//! use apprgate_chain::Normalizer;
//! use apprgate_core::types::Intent;
//!
//! let normalizer = Normalizer::default();
//! let info = normalizer
//!     .normalize("ETH", r#"{"to":"0xabc","value":"1"}"#, Intent::SignOnly)
//!     .unwrap();
//! assert_eq!(info.method, "eth_signTransaction");
//!
//! assert!(normalizer.normalize("Cosmos", "", Intent::Send).is_err());
//! ```

use crate::benfen::BenfenNormalizer;
use crate::chain::ChainNormalizer;
use crate::evm::EvmNormalizer;
use crate::registry::ChainRegistry;
use crate::solana::SolanaNormalizer;
use apprgate_core::error::{NormalizeError, NormalizeResult};
use apprgate_core::types::{CanonicalTxInfo, ChainFamily, Intent};

static SOLANA: SolanaNormalizer = SolanaNormalizer::new();
static EVM: EvmNormalizer = EvmNormalizer::new();
static BENFEN: BenfenNormalizer = BenfenNormalizer::new();

/// Returns the normalizer for `family`.
#[must_use]
pub fn normalizer_for(family: ChainFamily) -> &'static dyn ChainNormalizer {
    match family {
        ChainFamily::InstructionModel => &SOLANA,
        ChainFamily::EvmLike => &EVM,
        ChainFamily::OpaquePayload => &BENFEN,
    }
}

/// Normalizes raw payloads for any registered chain.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    registry: ChainRegistry,
}

impl Normalizer {
    /// Creates a normalizer over `registry`.
    #[must_use]
    pub const fn new(registry: ChainRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Family of `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnsupportedChain`] if `chain` is not registered.
    pub fn family_of(&self, chain: &str) -> NormalizeResult<ChainFamily> {
        self.registry
            .family_of(chain)
            .ok_or_else(|| NormalizeError::unsupported_chain(chain))
    }

    /// Builds the canonical descriptor for `raw` on `chain`.
    ///
    /// For [`Intent::SignMessage`], `raw` is the message; otherwise it is the
    /// chain's raw transaction.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnsupportedChain`] for an unknown chain and
    /// [`NormalizeError::Decode`] for a malformed payload.
    pub fn normalize(&self, chain: &str, raw: &str, intent: Intent) -> NormalizeResult<CanonicalTxInfo> {
        let family = self.family_of(chain)?;
        let info = normalizer_for(family).normalize(chain, raw, intent)?;

        tracing::debug!(
            chain,
            %family,
            %intent,
            method = %info.method,
            "normalized payload"
        );

        Ok(info)
    }
}
