//! # apprgate-chain
//!
//! Turns chain-specific raw transactions and messages into the chain-agnostic
//! [`CanonicalTxInfo`](apprgate_core::types::CanonicalTxInfo) the custody
//! service and the policy engine work on.
//!
//! ## Modules
//!
//! - [`chain`] - The [`ChainNormalizer`] trait
//! - [`solana`] - Instruction-model family (base64 wire transactions)
//! - [`evm`] - EVM family (JSON transaction objects)
//! - [`benfen`] - Opaque-payload family (verbatim transactions, digest-signed messages)
//! - [`registry`] - Chain name to family mapping
//! - [`normalizer`] - Dispatch by chain name
//!
//! ## Example
//!
//! ```
//! use apprgate_chain::{ChainRegistry, Normalizer};
//! use apprgate_core::types::{ChainFamily, Intent};
//!
//! let mut registry = ChainRegistry::new();
//! registry.register("Base", ChainFamily::EvmLike);
//!
//! let normalizer = Normalizer::new(registry);
//! let info = normalizer
//!     .normalize("Base", "0x68656c6c6f", Intent::SignMessage)
//!     .unwrap();
//! assert_eq!(info.method, "personal_sign");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod benfen;
pub mod chain;
pub mod evm;
pub mod normalizer;
pub mod registry;
pub mod solana;

pub use benfen::BenfenNormalizer;
pub use chain::ChainNormalizer;
pub use evm::EvmNormalizer;
pub use normalizer::{normalizer_for, Normalizer};
pub use registry::{ChainRegistry, BUILTIN_CHAINS};
pub use solana::SolanaNormalizer;
