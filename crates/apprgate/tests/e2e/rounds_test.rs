//! Approver and manager rounds over a batch of pending records.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use apprgate::dispatch::SignAction;
use apprgate::protocol::{Approver, Manager};
use apprgate_core::error::{CustodyError, DispatchError};
use apprgate_core::rules::{Policy, Rule, RuleKind};
use apprgate_core::types::{ActionCategory, ApprovalStatus};
use apprgate_policy::PolicySet;
use serde_json::json;

use super::common::{descriptor, pending, protocol, record, MockCustodyClient, MockDispatcher};

/// Approves ETH sends up to 100 wei and every BSC record.
fn policies() -> Arc<PolicySet> {
    Arc::new(PolicySet::new(vec![
        Policy::new(
            vec![Rule::new("chain", "ETH", RuleKind::Exact)],
            vec![Rule::new("payload.value", "100", RuleKind::Lte)],
        ),
        Policy::new(vec![Rule::new("chain", "BSC", RuleKind::Exact)], vec![]),
    ]))
}

fn approver(custody: &Arc<MockCustodyClient>) -> Approver {
    Approver::new(protocol(Arc::clone(custody), 1), policies())
}

#[tokio::test]
async fn test_approver_decides_each_record() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![
        pending("small", ActionCategory::Transaction, descriptor("ETH", "eth_sendTransaction", "5")),
        pending("large", ActionCategory::Transaction, descriptor("ETH", "eth_sendTransaction", "500")),
        pending("solana", ActionCategory::Transaction, json!({"chain": "Solana"})),
        record("done", ApprovalStatus::Agree),
    ]);

    let report = approver(&custody).run_round().await.unwrap();

    assert_eq!(
        custody.decisions(),
        vec![("small".to_string(), true), ("large".to_string(), false)]
    );
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.approved().count(), 1);
    assert_eq!(report.skipped, vec!["solana".to_string(), "done".to_string()]);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_approver_continues_after_decision_failure() {
    let custody = Arc::new(MockCustodyClient::new());
    custody
        .set_pending(vec![
            pending("a", ActionCategory::Transaction, descriptor("BSC", "", "1")),
            pending("b", ActionCategory::Transaction, descriptor("BSC", "", "1")),
            pending("c", ActionCategory::Transaction, descriptor("BSC", "", "1")),
        ])
        .fail_decision("b");

    let report = approver(&custody).run_round().await.unwrap();

    assert_eq!(
        custody.decisions(),
        vec![("a".to_string(), true), ("c".to_string(), true)]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].record_id, "b");
    assert!(matches!(
        report.failures[0].error,
        CustodyError::Service { code: 4001, .. }
    ));
}

#[tokio::test]
async fn test_approver_list_failure_aborts_round() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.go_down();

    let err = approver(&custody).run_round().await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_outcome_carries_sign_only_flag() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![pending(
        "r1",
        ActionCategory::TransactionContractInteraction,
        descriptor("BSC", "eth_signTransaction", "1"),
    )]);

    let report = approver(&custody).run_round().await.unwrap();
    let outcome = &report.outcomes[0];

    assert!(outcome.approved);
    assert!(outcome.sign_only);
    assert_eq!(outcome.wallet_id, "wallet-1");
    assert_eq!(outcome.action, ActionCategory::TransactionContractInteraction);
}

#[tokio::test]
async fn test_manager_dispatches_by_kind() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![
        pending("send", ActionCategory::Transaction, descriptor("BSC", "", "1")),
        pending(
            "sign-only",
            ActionCategory::TransactionContractInteraction,
            descriptor("BSC", "eth_signTransaction", "1"),
        ),
        pending(
            "message",
            ActionCategory::TransactionSignature,
            json!({"chain": "BSC", "method": "personal_sign"}),
        ),
        pending("rejected", ActionCategory::Transaction, descriptor("ETH", "", "1000")),
    ]);
    let dispatcher = Arc::new(MockDispatcher::new());

    let manager = Manager::new(approver(&custody), dispatcher.clone());
    let report = manager.run_round().await.unwrap();

    assert_eq!(
        dispatcher.calls(),
        vec![
            ("send".to_string(), SignAction::SendTransaction),
            ("sign-only".to_string(), SignAction::SignTransaction),
            ("message".to_string(), SignAction::SignMessage),
        ]
    );
    assert_eq!(report.dispatched.len(), 3);
    assert_eq!(report.dispatched[0].result, "send_transaction:send");
    assert_eq!(report.round.outcomes.len(), 4);
}

#[tokio::test]
async fn test_manager_collects_dispatch_failures() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![
        pending("a", ActionCategory::Transaction, descriptor("BSC", "", "1")),
        pending("b", ActionCategory::Transaction, descriptor("BSC", "", "1")),
    ]);
    let dispatcher = Arc::new(MockDispatcher::new());
    dispatcher.refuse("a");

    let manager = Manager::new(approver(&custody), dispatcher.clone());
    let report = manager.run_round().await.unwrap();

    assert_eq!(dispatcher.calls().len(), 2);
    assert_eq!(report.dispatched.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].approval_id, "a");
    assert!(matches!(report.failures[0].error, DispatchError::Refused { code: 500, .. }));
}
