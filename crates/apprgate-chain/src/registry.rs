//! Chain registry: chain name to [`ChainFamily`].
//!
//! [`ChainRegistry::new`] knows the chains the custody service supports out of
//! the box. More names can be mapped onto an existing family at runtime or
//! through the `[chains]` table of the configuration file.
//!
//! # Example
//!
//! ```
//! use apprgate_chain::ChainRegistry;
//! use apprgate_core::types::ChainFamily;
//!
//! let mut registry = ChainRegistry::new();
//! assert_eq!(registry.family_of("BSC"), Some(ChainFamily::EvmLike));
//!
//! registry.register("Base", ChainFamily::EvmLike);
//! assert!(registry.supports("Base"));
//! assert!(!registry.supports("eth"));
//! ```
//!
//! Names are case-sensitive, matching the custody service.

use apprgate_core::types::ChainFamily;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Built-in chain names and their families.
pub const BUILTIN_CHAINS: [(&str, ChainFamily); 10] = [
    ("Solana", ChainFamily::InstructionModel),
    ("ETH", ChainFamily::EvmLike),
    ("BSC", ChainFamily::EvmLike),
    ("Polygon", ChainFamily::EvmLike),
    ("Arbitrum", ChainFamily::EvmLike),
    ("Optimism", ChainFamily::EvmLike),
    ("Avalanche", ChainFamily::EvmLike),
    ("Fantom", ChainFamily::EvmLike),
    ("Benfen", ChainFamily::OpaquePayload),
    ("BenfenTEST", ChainFamily::OpaquePayload),
];

/// Maps chain names to encoding families.
///
/// Cloning is cheap (`Arc` internally); [`register`](Self::register) copies on write.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Arc<HashMap<String, ChainFamily>>,
}

impl ChainRegistry {
    /// Creates a registry with the built-in chains.
    #[must_use]
    pub fn new() -> Self {
        let chains = BUILTIN_CHAINS
            .iter()
            .map(|(name, family)| ((*name).to_string(), *family))
            .collect();
        Self {
            chains: Arc::new(chains),
        }
    }

    /// Creates a registry with no chains.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            chains: Arc::new(HashMap::new()),
        }
    }

    /// Creates a registry with the built-in chains plus `extra`.
    ///
    /// Entries in `extra` override built-in names.
    #[must_use]
    pub fn with_extra(extra: &BTreeMap<String, ChainFamily>) -> Self {
        let mut registry = Self::new();
        for (name, family) in extra {
            registry.register(name.clone(), *family);
        }
        registry
    }

    /// Maps `name` to `family`, replacing any previous mapping.
    pub fn register(&mut self, name: impl Into<String>, family: ChainFamily) {
        let name = name.into();
        tracing::debug!(chain = %name, %family, "registering chain");
        Arc::make_mut(&mut self.chains).insert(name, family);
    }

    /// Family of `name`, if known.
    #[must_use]
    pub fn family_of(&self, name: &str) -> Option<ChainFamily> {
        self.chains.get(name).copied()
    }

    /// Returns `true` if `name` is known.
    #[must_use]
    pub fn supports(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// Known chain names, sorted.
    #[must_use]
    pub fn supported_chains(&self) -> Vec<&str> {
        let mut chains: Vec<&str> = self.chains.keys().map(String::as_str).collect();
        chains.sort_unstable();
        chains
    }

    /// Number of known chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if no chains are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
