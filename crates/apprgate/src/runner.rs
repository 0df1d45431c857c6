//! The role loop.
//!
//! - `initiator`: submits the configured descriptor once and returns
//! - `approver`: one decision round every `runner.round_interval_secs`
//! - `manager`: one decision-and-dispatch round every `runner.round_interval_secs`
//!
//! Round errors are logged and the loop goes on until shutdown.

use crate::custody::CustodyClient;
use crate::dispatch::SigningDispatcher;
use crate::logging::new_correlation_id;
use crate::protocol::{
    implied_intent, ApprovalProtocol, Approver, Initiator, Manager, ManagerReport, PollSchedule,
    RoundReport,
};
use apprgate_chain::{ChainRegistry, Normalizer};
use apprgate_core::config::{Config, Role};
use apprgate_core::error::{ConfigError, Result};
use apprgate_policy::PolicySet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::Instrument;

/// What one round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundSummary {
    /// The initiator's descriptor resolved to this result.
    Submitted(String),
    /// An approver round.
    Approved(RoundReport),
    /// A manager round.
    Managed(ManagerReport),
}

/// Runs rounds for any role from one configuration.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
    initiator: Initiator,
    approver: Approver,
    manager: Manager,
    round_interval: Duration,
}

impl Runner {
    /// Wires the collaborators to the configured chains, policies and schedule.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` does not validate.
    pub fn new(
        config: Config,
        custody: Arc<dyn CustodyClient>,
        dispatcher: Arc<dyn SigningDispatcher>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let policies = PolicySet::new(config.policies.clone());
        for warning in policies.validate() {
            tracing::warn!(%warning, "policy rule will never pass");
        }

        let normalizer = Normalizer::new(ChainRegistry::with_extra(&config.chains));
        let protocol = ApprovalProtocol::new(custody, normalizer, PollSchedule::from(&config.poll));
        let initiator = Initiator::new(protocol.clone(), config.custody.wallet_id.clone());
        let approver = Approver::new(protocol, Arc::new(policies));
        let manager = Manager::new(approver.clone(), dispatcher);

        Ok(Self {
            round_interval: config.runner.round_interval(),
            config,
            initiator,
            approver,
            manager,
        })
    }

    /// Overrides the pause between rounds.
    #[must_use]
    pub const fn with_round_interval(mut self, interval: Duration) -> Self {
        self.round_interval = interval;
        self
    }

    /// The initiator facade.
    #[must_use]
    pub const fn initiator(&self) -> &Initiator {
        &self.initiator
    }

    /// Runs a single round for `role`.
    ///
    /// # Errors
    ///
    /// Whatever the round fails with. For the initiator, a missing descriptor is
    /// a configuration error.
    pub async fn run_once(&self, role: Role) -> Result<RoundSummary> {
        let span = tracing::info_span!("round", %role, correlation_id = %new_correlation_id());
        self.round(role).instrument(span).await
    }

    async fn round(&self, role: Role) -> Result<RoundSummary> {
        match role {
            Role::Initiator => {
                let tx_info = self
                    .config
                    .tx_info
                    .as_ref()
                    .ok_or_else(|| ConfigError::invalid_value("tx_info", "<missing>"))?;
                let result = self
                    .initiator
                    .send_tx_info(tx_info, implied_intent(tx_info))
                    .await?;
                tracing::info!(%result, "approval resolved");
                Ok(RoundSummary::Submitted(result))
            }
            Role::Approver => Ok(RoundSummary::Approved(self.approver.run_round().await?)),
            Role::Manager => Ok(RoundSummary::Managed(self.manager.run_round().await?)),
        }
    }

    /// Runs `role` until `shutdown` fires.
    ///
    /// The initiator role runs exactly once and returns its result. Other roles
    /// repeat their round, pausing between rounds, and return `Ok(None)` on
    /// shutdown.
    ///
    /// # Errors
    ///
    /// Only the initiator role returns errors; round errors of other roles are
    /// logged.
    pub async fn run(
        &self,
        role: Role,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Result<Option<String>> {
        if role == Role::Initiator {
            return match self.run_once(role).await? {
                RoundSummary::Submitted(result) => Ok(Some(result)),
                RoundSummary::Approved(_) | RoundSummary::Managed(_) => Ok(None),
            };
        }

        tracing::info!(%role, interval = ?self.round_interval, "runner started");

        loop {
            if let Err(error) = self.run_once(role).await {
                tracing::error!(%role, %error, "round failed");
            }

            tokio::select! {
                _ = &mut shutdown => break,
                () = tokio::time::sleep(self.round_interval) => {}
            }
        }

        tracing::info!(%role, "runner stopped");
        Ok(None)
    }
}
