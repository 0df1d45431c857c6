//! Initiator flow: submit, poll, and extract the result of an agreed record.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use apprgate::protocol::Initiator;
use apprgate_core::error::{ApprovalGateError, CustodyError, ProtocolError};
use apprgate_core::types::{ActionCategory, ApprovalStatus, PendingApproval};
use apprgate_core::value::Value;
use serde_json::json;

use super::common::{descriptor, protocol, record, MockCustodyClient, ORIGIN_ID};

const EVM_TX: &str = r#"{"from":"0x01","to":"0x02","value":"1000"}"#;

fn initiator(custody: &Arc<MockCustodyClient>, attempts: u32) -> Initiator {
    Initiator::new(protocol(Arc::clone(custody), attempts), "wallet-1")
}

fn agreed(extra_data: serde_json::Value, tx_hash: &str) -> PendingApproval {
    PendingApproval {
        tx_hash: tx_hash.to_string(),
        extra_data: Value::from(extra_data),
        ..record(ORIGIN_ID, ApprovalStatus::Agree)
    }
}

// ============================================================================
// Results
// ============================================================================

#[tokio::test]
async fn test_send_returns_tx_hash_on_first_poll() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.push_poll(vec![agreed(json!({}), "0xabc")]);

    let hash = initiator(&custody, 15)
        .send_transaction("ETH", EVM_TX)
        .await
        .unwrap();

    assert_eq!(hash, "0xabc");
    assert_eq!(custody.poll_calls(), 1);

    let created = custody.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].wallet_id, "wallet-1");
    assert_eq!(created[0].action, ActionCategory::Transaction);
    assert_eq!(created[0].expiry_seconds, 0);
    assert_eq!(created[0].tx_info.method, "eth_sendTransaction");
}

#[tokio::test]
async fn test_unrelated_records_are_ignored() {
    let custody = Arc::new(MockCustodyClient::new());
    let other = PendingApproval {
        tx_hash: "0xother".to_string(),
        ..record("someone-else", ApprovalStatus::Agree)
    };
    custody.push_poll(vec![other, agreed(json!({}), "0xmine")]);

    let hash = initiator(&custody, 3)
        .send_transaction("ETH", EVM_TX)
        .await
        .unwrap();
    assert_eq!(hash, "0xmine");
}

#[tokio::test]
async fn test_sign_only_unwraps_benfen_payload() {
    let custody = Arc::new(MockCustodyClient::new());
    let custom = json!({"data": r#"["meta", ["signed-tx-bytes", "sig"], "x", "y"]"#}).to_string();
    custody.push_poll(vec![agreed(json!({ "customData": custom }), "")]);

    let signed = initiator(&custody, 15)
        .sign_transaction("BenfenTEST", "opaque-tx")
        .await
        .unwrap();

    assert_eq!(signed, "signed-tx-bytes");

    let created = custody.created();
    assert_eq!(created[0].action, ActionCategory::TransactionContractInteraction);
    assert_eq!(created[0].expiry_seconds, 300);
    assert_eq!(created[0].tx_info.method, "bfc_signTransaction");
}

#[tokio::test]
async fn test_sign_only_evm_takes_first_data_element() {
    let custody = Arc::new(MockCustodyClient::new());
    let custom = json!({"data": ["0xf86c...", "ignored"]}).to_string();
    custody.push_poll(vec![agreed(json!({ "customData": custom }), "0xhash")]);

    let signed = initiator(&custody, 15)
        .sign_transaction("Polygon", EVM_TX)
        .await
        .unwrap();
    assert_eq!(signed, "0xf86c...");
}

#[tokio::test]
async fn test_message_signature_uses_final_hash() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.push_poll(vec![agreed(
        json!({"authorization": {"finalHash": "0xsig"}}),
        "0xhash",
    )]);

    let signature = initiator(&custody, 15)
        .sign_message("ETH", "0x68656c6c6f")
        .await
        .unwrap();

    assert_eq!(signature, "0xsig");
    assert_eq!(custody.created()[0].action, ActionCategory::TransactionSignature);
}

#[tokio::test]
async fn test_message_signature_without_authorization_uses_hash() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.push_poll(vec![agreed(json!({}), "0xhash")]);

    let signature = initiator(&custody, 15)
        .sign_message("ETH", "0x68656c6c6f")
        .await
        .unwrap();
    assert_eq!(signature, "0xhash");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_times_out_after_every_attempt() {
    let custody = Arc::new(MockCustodyClient::new());

    let err = initiator(&custody, 15)
        .send_transaction("ETH", EVM_TX)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApprovalGateError::Protocol(ProtocolError::Timeout { attempts: 15, .. })
    ));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(custody.poll_calls(), 15);
}

#[tokio::test]
async fn test_reject_stops_polling() {
    let custody = Arc::new(MockCustodyClient::new());
    custody
        .push_poll(vec![record(ORIGIN_ID, ApprovalStatus::Ing)])
        .push_poll(vec![record(ORIGIN_ID, ApprovalStatus::Ing)])
        .push_poll(vec![record(ORIGIN_ID, ApprovalStatus::Reject)]);

    let err = initiator(&custody, 15)
        .send_transaction("ETH", EVM_TX)
        .await
        .unwrap_err();

    match err {
        ApprovalGateError::Protocol(ProtocolError::Rejected { record_id }) => {
            assert_eq!(record_id, ORIGIN_ID);
        }
        other => panic!("expected rejection, got {other}"),
    }
    assert_eq!(custody.poll_calls(), 3);
}

#[tokio::test]
async fn test_empty_custom_data_is_an_extraction_error() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.push_poll(vec![agreed(json!({"customData": ""}), "0xhash")]);

    let err = initiator(&custody, 15)
        .sign_transaction("ETH", EVM_TX)
        .await
        .unwrap_err();

    match err {
        ApprovalGateError::Protocol(ProtocolError::ResultExtraction { reason, .. }) => {
            assert_eq!(reason, "customData is empty");
        }
        other => panic!("expected extraction error, got {other}"),
    }
}

#[tokio::test]
async fn test_agreed_without_hash_is_an_extraction_error() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.push_poll(vec![agreed(json!({}), "")]);

    let err = initiator(&custody, 15)
        .send_transaction("ETH", EVM_TX)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApprovalGateError::Protocol(ProtocolError::ResultExtraction { .. })
    ));
}

#[tokio::test]
async fn test_transport_error_on_submit() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.go_down();

    let err = initiator(&custody, 15)
        .send_transaction("ETH", EVM_TX)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApprovalGateError::Custody(CustodyError::Transport(_))
    ));
    assert_eq!(custody.poll_calls(), 0);
}

#[tokio::test]
async fn test_unsupported_chain_never_reaches_custody() {
    let custody = Arc::new(MockCustodyClient::new());

    let err = initiator(&custody, 15)
        .send_transaction("Cosmos", EVM_TX)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 4);
    assert!(custody.created().is_empty());
}

#[tokio::test]
async fn test_descriptor_for_unregistered_chain_is_submitted_as_evm() {
    use apprgate_core::types::{CanonicalTxInfo, ChainFamily, Intent};

    let custody = Arc::new(MockCustodyClient::new());
    let custom = json!({"data": ["0xsigned", "ignored"]}).to_string();
    custody.push_poll(vec![agreed(json!({ "customData": custom }), "0xhash")]);

    let tx_info: CanonicalTxInfo =
        serde_json::from_value(descriptor("Base", "eth_signTransaction", "1")).unwrap();
    let protocol = protocol(Arc::clone(&custody), 15);

    let submission = protocol
        .submit("wallet-1", &tx_info, Intent::Send)
        .await
        .unwrap();
    assert_eq!(submission.family, ChainFamily::EvmLike);
    assert_eq!(submission.intent, Intent::SignOnly);
    assert_eq!(custody.created()[0].tx_info.chain, "Base");

    assert_eq!(protocol.poll(&submission).await.unwrap(), "0xsigned");
}

#[tokio::test]
async fn test_transport_error_while_polling_is_not_a_timeout() {
    use apprgate::protocol::Submission;
    use apprgate_core::types::{ChainFamily, Intent};

    let custody = Arc::new(MockCustodyClient::new());
    custody.go_down();
    let submission = Submission {
        origin_id: ORIGIN_ID.to_string(),
        action: ActionCategory::Transaction,
        intent: Intent::Send,
        family: ChainFamily::EvmLike,
    };

    let err = protocol(Arc::clone(&custody), 15)
        .poll(&submission)
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Custody(CustodyError::Transport(_))));
}
