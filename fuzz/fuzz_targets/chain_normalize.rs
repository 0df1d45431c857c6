//! Fuzz target for chain normalization.
//!
//! Feeds arbitrary payloads to every chain family under every intent, and
//! arbitrary service responses to the signed-transaction hooks. Undecodable
//! input must come back as an error, never a panic.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run chain_normalize
//! ```

#![no_main]

use apprgate_chain::{normalizer_for, ChainNormalizer, Normalizer};
use apprgate_core::types::{ChainFamily, Intent};
use libfuzzer_sys::fuzz_target;

const CHAINS: [&str; 3] = ["Solana", "ETH", "BenfenTEST"];
const INTENTS: [Intent; 3] = [Intent::Send, Intent::SignOnly, Intent::SignMessage];

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let normalizer = Normalizer::default();
    for chain in CHAINS {
        for intent in INTENTS {
            if let Ok(tx_info) = normalizer.normalize(chain, raw, intent) {
                assert_eq!(tx_info.chain, chain);
                let _ = tx_info.to_value();
            }
        }
    }

    for family in [
        ChainFamily::InstructionModel,
        ChainFamily::EvmLike,
        ChainFamily::OpaquePayload,
    ] {
        let _ = normalizer_for(family).signed_transaction(raw);
    }
});
