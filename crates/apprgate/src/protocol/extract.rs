//! What an agreed record resolves to.
//!
//! - Sign-only: the signed transaction carried in `extraData.customData`, a
//!   JSON string whose `data` member is either a string or a list starting
//!   with one. The family's
//!   [`signed_transaction`](apprgate_chain::ChainNormalizer::signed_transaction)
//!   hook then unwraps it.
//! - Message signature with `extraData.authorization`: its `finalHash`.
//! - Anything else: the record's `txHash`.
//!
//! An empty result is never returned.

use super::Submission;
use apprgate_chain::normalizer_for;
use apprgate_core::error::{ProtocolError, ProtocolResult};
use apprgate_core::types::{ActionCategory, Intent, PendingApproval};
use apprgate_core::value::Value;

/// Extracts the result of an agreed `record` opened by `submission`.
///
/// # Errors
///
/// Returns [`ProtocolError::ResultExtraction`] if the record carries no usable result.
pub fn extract_result(record: &PendingApproval, submission: &Submission) -> ProtocolResult<String> {
    let record_id = record.record_id.as_str();

    let result = if submission.intent == Intent::SignOnly {
        let raw = custom_data_transaction(record)?;
        normalizer_for(submission.family)
            .signed_transaction(&raw)
            .ok_or_else(|| {
                ProtocolError::extraction(
                    record_id,
                    format!("invalid {} signed transaction data", submission.family),
                )
            })?
    } else if submission.action == ActionCategory::TransactionSignature {
        match record.extra_data.get("authorization") {
            Some(auth @ Value::Map(_)) => auth
                .get("finalHash")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => record.tx_hash.clone(),
        }
    } else {
        record.tx_hash.clone()
    };

    if result.is_empty() {
        return Err(ProtocolError::extraction(record_id, "sign result is empty"));
    }
    Ok(result)
}

/// Pulls the raw signed transaction out of `extraData.customData`.
fn custom_data_transaction(record: &PendingApproval) -> ProtocolResult<String> {
    let record_id = record.record_id.as_str();

    let custom = match record.extra_data.get("customData") {
        Some(Value::String(s)) if !s.is_empty() => {
            serde_json::from_str(s).unwrap_or(serde_json::Value::Null)
        }
        Some(tree @ Value::Map(_)) => tree.to_json(),
        _ => return Err(ProtocolError::extraction(record_id, "customData is empty")),
    };

    let raw = match custom.get("data") {
        None | Some(serde_json::Value::Null) => "",
        Some(serde_json::Value::String(data)) => data.as_str(),
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ProtocolError::extraction(record_id, "invalid customData"))?,
        Some(_) => return Err(ProtocolError::extraction(record_id, "invalid customData")),
    };

    if raw.is_empty() {
        return Err(ProtocolError::extraction(record_id, "signed transaction is empty"));
    }
    Ok(raw.to_string())
}
