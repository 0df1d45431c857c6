//! # Test Utilities
//!
//! Scripted in-memory collaborators for driving the approval protocol without a
//! custody service.
//!
//! - [`MockCustodyClient`] - replays queued poll responses and records requests
//! - [`MockDispatcher`] - records dispatched actions, optionally refusing some
//! - [`record`] / [`descriptor`] - builders for approval records

#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use apprgate::custody::{CreatedApproval, CustodyClient, CustodyResult, DecisionAck, NewApproval};
use apprgate::dispatch::{DispatchAck, SignAction, SigningDispatcher};
use apprgate::protocol::{ApprovalProtocol, PollSchedule};
use apprgate_chain::Normalizer;
use apprgate_core::error::{CustodyError, DispatchError};
use apprgate_core::types::{ActionCategory, ApprovalStatus, PendingApproval};
use apprgate_core::value::Value;
use async_trait::async_trait;
use serde_json::json;

/// Origin id every [`MockCustodyClient::create_approval`] returns.
pub const ORIGIN_ID: &str = "origin-1";

// ============================================================================
// Custody
// ============================================================================

/// A custody client whose answers are queued up front.
///
/// Each `get_approvals_by_record` call pops one queued response; once the
/// queue is empty it answers with the record still pending.
#[derive(Default)]
pub struct MockCustodyClient {
    polls: Mutex<VecDeque<Vec<PendingApproval>>>,
    pending: Mutex<Vec<PendingApproval>>,
    created: Mutex<Vec<NewApproval>>,
    decisions: Mutex<Vec<(String, bool)>>,
    failing_decisions: Mutex<HashSet<String>>,
    transport_down: AtomicBool,
    poll_calls: AtomicUsize,
}

impl MockCustodyClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the records returned by the next poll.
    pub fn push_poll(&self, records: Vec<PendingApproval>) -> &Self {
        self.polls.lock().unwrap().push_back(records);
        self
    }

    /// Sets the records `list_approvals` returns.
    pub fn set_pending(&self, records: Vec<PendingApproval>) -> &Self {
        *self.pending.lock().unwrap() = records;
        self
    }

    /// Makes `set_decision` fail for `record_id`.
    pub fn fail_decision(&self, record_id: &str) -> &Self {
        self.failing_decisions
            .lock()
            .unwrap()
            .insert(record_id.to_string());
        self
    }

    /// Makes every call fail with a transport error.
    pub fn go_down(&self) -> &Self {
        self.transport_down.store(true, Ordering::SeqCst);
        self
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<NewApproval> {
        self.created.lock().unwrap().clone()
    }

    pub fn decisions(&self) -> Vec<(String, bool)> {
        self.decisions.lock().unwrap().clone()
    }

    fn check_transport(&self) -> CustodyResult<()> {
        if self.transport_down.load(Ordering::SeqCst) {
            return Err(CustodyError::transport("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl CustodyClient for MockCustodyClient {
    async fn list_approvals(&self, status: ApprovalStatus) -> CustodyResult<Vec<PendingApproval>> {
        self.check_transport()?;
        assert_eq!(status, ApprovalStatus::Ing);
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn get_approvals_by_record(&self, record_id: &str) -> CustodyResult<Vec<PendingApproval>> {
        self.check_transport()?;
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.polls.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| vec![record(record_id, ApprovalStatus::Ing)]))
    }

    async fn create_approval(&self, request: NewApproval) -> CustodyResult<CreatedApproval> {
        self.check_transport()?;
        self.created.lock().unwrap().push(request);
        Ok(CreatedApproval {
            origin_record_id: ORIGIN_ID.to_string(),
        })
    }

    async fn set_decision(&self, record_id: &str, agree: bool) -> CustodyResult<DecisionAck> {
        self.check_transport()?;
        if self.failing_decisions.lock().unwrap().contains(record_id) {
            return Err(CustodyError::service(4001, "record already decided"));
        }
        self.decisions
            .lock()
            .unwrap()
            .push((record_id.to_string(), agree));
        Ok(DecisionAck {
            record_id: record_id.to_string(),
        })
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// A dispatcher that records what it was asked to do.
#[derive(Default)]
pub struct MockDispatcher {
    calls: Mutex<Vec<(String, SignAction)>>,
    refused: Mutex<HashSet<String>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes dispatch fail for `approval_id`.
    pub fn refuse(&self, approval_id: &str) -> &Self {
        self.refused.lock().unwrap().insert(approval_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, SignAction)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SigningDispatcher for MockDispatcher {
    async fn dispatch(
        &self,
        approval_id: &str,
        action: SignAction,
    ) -> Result<DispatchAck, DispatchError> {
        self.calls
            .lock()
            .unwrap()
            .push((approval_id.to_string(), action));

        if self.refused.lock().unwrap().contains(approval_id) {
            return Err(DispatchError::Refused {
                code: 500,
                message: "signer unavailable".to_string(),
            });
        }

        Ok(DispatchAck {
            approval_id: approval_id.to_string(),
            action,
            result: format!("{action}:{approval_id}"),
        })
    }
}

// ============================================================================
// Builders
// ============================================================================

/// A protocol over `custody` with built-in chains and `attempts` immediate polls.
pub fn protocol(custody: Arc<MockCustodyClient>, attempts: u32) -> ApprovalProtocol {
    ApprovalProtocol::new(custody, Normalizer::default(), PollSchedule::immediate(attempts))
}

/// A plain record with the given status and no payload.
pub fn record(record_id: &str, status: ApprovalStatus) -> PendingApproval {
    PendingApproval {
        record_id: record_id.to_string(),
        status,
        ..PendingApproval::default()
    }
}

/// A pending record carrying `tx_info` as its descriptor.
pub fn pending(record_id: &str, action: ActionCategory, tx_info: serde_json::Value) -> PendingApproval {
    PendingApproval {
        chain: tx_info
            .get("chain")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        action,
        wallet_id: "wallet-1".to_string(),
        tx_info: Value::from(tx_info),
        ..record(record_id, ApprovalStatus::Ing)
    }
}

/// An EVM send descriptor of `value` wei.
pub fn descriptor(chain: &str, method: &str, value: &str) -> serde_json::Value {
    json!({
        "chain": chain,
        "method": method,
        "transactionType": "native",
        "payload": {"from": "0x01", "to": "0x02", "value": value}
    })
}
