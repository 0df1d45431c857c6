//! The custody-service collaborator.
//!
//! The approval protocol never talks to the network itself; it drives a
//! [`CustodyClient`]. Production code plugs in an HTTP client, tests plug in a
//! scripted mock.
//!
//! # Example
//!
//! ```
//! use apprgate::custody::{CreatedApproval, CustodyClient, DecisionAck, NewApproval};
//! use apprgate_core::error::CustodyError;
//! use apprgate_core::types::{ApprovalStatus, PendingApproval};
//! use async_trait::async_trait;
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl CustodyClient for Offline {
//!     async fn list_approvals(&self, _: ApprovalStatus) -> Result<Vec<PendingApproval>, CustodyError> {
//!         Ok(Vec::new())
//!     }
//!     async fn get_approvals_by_record(&self, _: &str) -> Result<Vec<PendingApproval>, CustodyError> {
//!         Ok(Vec::new())
//!     }
//!     async fn create_approval(&self, _: NewApproval) -> Result<CreatedApproval, CustodyError> {
//!         Err(CustodyError::transport("offline"))
//!     }
//!     async fn set_decision(&self, _: &str, _: bool) -> Result<DecisionAck, CustodyError> {
//!         Err(CustodyError::transport("offline"))
//!     }
//! }
//! ```

use apprgate_core::error::CustodyError;
use apprgate_core::types::{ActionCategory, ApprovalStatus, CanonicalTxInfo, PendingApproval};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for custody-service calls.
pub type CustodyResult<T> = Result<T, CustodyError>;

/// A request to open a new approval record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApproval {
    /// Wallet the transaction belongs to.
    pub wallet_id: String,
    /// Action category of the record.
    pub action: ActionCategory,
    /// Descriptor approvers will see.
    pub tx_info: CanonicalTxInfo,
    /// Free-form note; always empty today.
    pub note: String,
    /// Seconds until the service expires the record; `0` for none.
    pub expiry_seconds: u32,
}

/// Acknowledgement of [`CustodyClient::create_approval`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApproval {
    /// Id under which the record can be polled.
    pub origin_record_id: String,
}

/// Acknowledgement of [`CustodyClient::set_decision`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAck {
    /// Id of the decided record, as the service reports it.
    pub record_id: String,
}

/// Operations the approval protocol needs from the custody service.
///
/// Every method is a single request; retries are up to the caller.
#[async_trait]
pub trait CustodyClient: Send + Sync {
    /// Lists approval records in `status`, as seen by this credential's approver.
    async fn list_approvals(&self, status: ApprovalStatus) -> CustodyResult<Vec<PendingApproval>>;

    /// Lists records this credential sponsored with the given origin id.
    ///
    /// The service may return unrelated records; callers filter by id.
    async fn get_approvals_by_record(&self, record_id: &str) -> CustodyResult<Vec<PendingApproval>>;

    /// Opens a new approval record.
    async fn create_approval(&self, request: NewApproval) -> CustodyResult<CreatedApproval>;

    /// Agrees (`true`) or rejects (`false`) a pending record.
    async fn set_decision(&self, record_id: &str, agree: bool) -> CustodyResult<DecisionAck>;
}
