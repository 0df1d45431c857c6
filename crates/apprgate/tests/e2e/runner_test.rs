//! Role-driven runner: single rounds, the initiator's one-shot submission and
//! shutdown of the round loop.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::sync::Arc;
use std::time::Duration;

use apprgate::runner::{RoundSummary, Runner};
use apprgate_core::config::{Config, Role};
use apprgate_core::error::ConfigError;
use apprgate_core::rules::{Policy, Rule, RuleKind};
use apprgate_core::types::{ActionCategory, ApprovalStatus, CanonicalTxInfo, PendingApproval};
use tokio::sync::oneshot;

use super::common::{descriptor, pending, MockCustodyClient, MockDispatcher, ORIGIN_ID};

fn approve_bsc() -> Config {
    Config::builder()
        .role(Role::Manager)
        .max_attempts(2)
        .poll_interval_secs(0)
        .policy(Policy::new(
            vec![Rule::new("chain", "BSC", RuleKind::Exact)],
            vec![],
        ))
        .build()
}

fn runner(config: Config, custody: &Arc<MockCustodyClient>) -> Runner {
    Runner::new(config, custody.clone(), Arc::new(MockDispatcher::new())).unwrap()
}

#[tokio::test]
async fn test_invalid_config_is_refused() {
    let config = Config::builder().role(Role::Initiator).build();
    let custody = Arc::new(MockCustodyClient::new());

    let err = Runner::new(config, custody, Arc::new(MockDispatcher::new())).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[tokio::test]
async fn test_run_once_per_role() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![pending(
        "r1",
        ActionCategory::Transaction,
        descriptor("BSC", "", "1"),
    )]);
    let runner = runner(approve_bsc(), &custody);

    match runner.run_once(Role::Approver).await.unwrap() {
        RoundSummary::Approved(report) => assert_eq!(report.outcomes.len(), 1),
        other => panic!("unexpected summary: {other:?}"),
    }

    match runner.run_once(Role::Manager).await.unwrap() {
        RoundSummary::Managed(report) => assert_eq!(report.dispatched.len(), 1),
        other => panic!("unexpected summary: {other:?}"),
    }
}

#[tokio::test]
async fn test_initiator_submits_configured_descriptor_once() {
    let tx_info: CanonicalTxInfo =
        serde_json::from_value(descriptor("ETH", "eth_sendTransaction", "1")).unwrap();
    let config = Config::builder()
        .role(Role::Initiator)
        .wallet_id("wallet-9")
        .poll_interval_secs(0)
        .tx_info(tx_info)
        .build();

    let custody = Arc::new(MockCustodyClient::new());
    custody.push_poll(vec![PendingApproval {
        record_id: ORIGIN_ID.to_string(),
        status: ApprovalStatus::Agree,
        tx_hash: "0xdone".to_string(),
        ..PendingApproval::default()
    }]);

    let (_tx, rx) = oneshot::channel();
    let result = runner(config, &custody).run(Role::Initiator, rx).await.unwrap();

    assert_eq!(result.as_deref(), Some("0xdone"));
    let created = custody.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].wallet_id, "wallet-9");
}

#[tokio::test]
async fn test_shutdown_before_start_runs_one_round() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![pending(
        "r1",
        ActionCategory::Transaction,
        descriptor("BSC", "", "1"),
    )]);

    let (tx, rx) = oneshot::channel();
    tx.send(()).unwrap();

    let result = runner(approve_bsc(), &custody)
        .with_round_interval(Duration::from_secs(3600))
        .run(Role::Approver, rx)
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(custody.decisions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_loop_repeats_until_shutdown() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.set_pending(vec![pending(
        "r1",
        ActionCategory::Transaction,
        descriptor("BSC", "", "1"),
    )]);

    let runner = Arc::new(runner(approve_bsc(), &custody).with_round_interval(Duration::from_secs(5)));
    let (tx, rx) = oneshot::channel();

    let handle = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run(Role::Approver, rx).await })
    };

    tokio::time::sleep(Duration::from_secs(12)).await;
    tx.send(()).unwrap();

    assert_eq!(handle.await.unwrap().unwrap(), None);
    assert!(custody.decisions().len() >= 2);
}

#[tokio::test]
async fn test_round_errors_do_not_stop_the_loop() {
    let custody = Arc::new(MockCustodyClient::new());
    custody.go_down();

    let (tx, rx) = oneshot::channel();
    tx.send(()).unwrap();

    let result = runner(approve_bsc(), &custody).run(Role::Manager, rx).await;
    assert!(matches!(result, Ok(None)));
}
