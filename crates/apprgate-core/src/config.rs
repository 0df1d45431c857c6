//! Configuration types for the approval gate.
//!
//! Configuration is stored in TOML format at `~/.apprgate/config.toml` and is
//! loaded once per run; there is no live reload.
//!
//! # Examples
//!
//! ```
//! use apprgate_core::config::{Config, Role};
//!
//! let config = Config::default();
//! assert_eq!(config.role, Role::Approver);
//! assert_eq!(config.poll.max_attempts, 15);
//! assert_eq!(config.poll.interval_secs, 2);
//!
//! let parsed: Config = toml::from_str(&Config::default_toml()).expect("valid TOML");
//! assert_eq!(parsed, config);
//! ```
//!
//! # Default TOML Output
//!
//! ```toml
//! role = "approver"
//!
//! [custody]
//! api_key = ""
//! api_secret = ""
//! wallet_id = ""
//!
//! [poll]
//! max_attempts = 15
//! interval_secs = 2
//!
//! [runner]
//! round_interval_secs = 5
//!
//! [chains]
//! # Sui = "opaque_payload"
//! ```

use crate::error::ConfigError;
use crate::rules::Policy;
use crate::types::{CanonicalTxInfo, ChainFamily};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which loop the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submit the configured descriptor once and wait for the result.
    Initiator,
    /// Decide pending approvals against the policy set.
    #[default]
    Approver,
    /// Decide pending approvals, then dispatch signing for the approved ones.
    Manager,
}

impl Role {
    /// Returns the configuration name of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initiator => "initiator",
            Self::Approver => "approver",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initiator" => Ok(Self::Initiator),
            "approver" => Ok(Self::Approver),
            "manager" => Ok(Self::Manager),
            other => Err(ConfigError::invalid_value("role", other)),
        }
    }
}

/// Credentials and wallet selection for the custody service.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustodyConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret. Never printed by `Debug`.
    #[serde(default)]
    pub api_secret: String,
    /// HD wallet that initiator submissions are created under.
    #[serde(default)]
    pub wallet_id: String,
}

impl fmt::Debug for CustodyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.api_secret.is_empty() { "" } else { "***" };
        f.debug_struct("CustodyConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &secret)
            .field("wallet_id", &self.wallet_id)
            .finish()
    }
}

const fn default_max_attempts() -> u32 {
    15
}

const fn default_interval_secs() -> u64 {
    2
}

/// Result polling schedule for initiator submissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollConfig {
    /// Number of status queries before giving up.
    ///
    /// Default: 15
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Seconds to wait between queries.
    ///
    /// Default: 2
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl PollConfig {
    /// Wait between queries as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_secs: default_interval_secs(),
        }
    }
}

const fn default_round_interval_secs() -> u64 {
    5
}

/// Approver/manager loop settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Seconds to sleep between rounds.
    ///
    /// Default: 5
    #[serde(default = "default_round_interval_secs")]
    pub round_interval_secs: u64,
}

impl RunnerConfig {
    /// Sleep between rounds as a [`Duration`].
    #[must_use]
    pub const fn round_interval(&self) -> Duration {
        Duration::from_secs(self.round_interval_secs)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            round_interval_secs: default_round_interval_secs(),
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use apprgate_core::config::{Config, Role};
///
/// let config: Config = toml::from_str(r#"
/// role = "manager"
///
/// [chains]
/// Sui = "opaque_payload"
///
/// [[policies]]
/// match_rules = [{ path = "chain", value = "ETH", rule = "exact" }]
/// verify_rules = []
/// "#).expect("valid TOML");
///
/// assert_eq!(config.role, Role::Manager);
/// assert_eq!(config.policies.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Which loop to run.
    #[serde(default)]
    pub role: Role,

    /// Custody service credentials.
    #[serde(default)]
    pub custody: CustodyConfig,

    /// Result polling schedule.
    #[serde(default)]
    pub poll: PollConfig,

    /// Round loop settings.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Extra chain names mapped to their encoding family, on top of the built-in ones.
    #[serde(default)]
    pub chains: BTreeMap<String, ChainFamily>,

    /// Descriptor the initiator role submits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_info: Option<CanonicalTxInfo>,

    /// Ordered policy set; the first policy whose match rules all pass decides.
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for:
    /// - a zero `poll.max_attempts` or `runner.round_interval_secs`
    /// - anything [`Config::validate_policies`] rejects
    /// - the initiator role without `custody.wallet_id` or `tx_info`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.max_attempts == 0 {
            return Err(ConfigError::invalid_value("poll.max_attempts", "0"));
        }

        if self.runner.round_interval_secs == 0 {
            return Err(ConfigError::invalid_value("runner.round_interval_secs", "0"));
        }

        self.validate_policies()?;

        if self.role == Role::Initiator {
            if self.custody.wallet_id.is_empty() {
                return Err(ConfigError::invalid_value("custody.wallet_id", "<empty>"));
            }
            if self.tx_info.is_none() {
                return Err(ConfigError::invalid_value("tx_info", "<missing>"));
            }
        }

        Ok(())
    }

    /// Validates only what offline evaluation needs: chain names and rules.
    /// The role and its custody settings are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty chain name or an
    /// empty rule path.
    pub fn validate_policies(&self) -> Result<(), ConfigError> {
        if self.chains.keys().any(String::is_empty) {
            return Err(ConfigError::invalid_value("chains", "<empty name>"));
        }

        for (i, policy) in self.policies.iter().enumerate() {
            for (set, rules) in [("match_rules", &policy.match_rules), ("verify_rules", &policy.verify_rules)] {
                if let Some(j) = rules.iter().position(|r| r.path.is_empty()) {
                    return Err(ConfigError::invalid_value(
                        format!("policies[{i}].{set}[{j}].path"),
                        "<empty>",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns the default configuration file content, with commented examples.
    #[must_use]
    pub fn default_toml() -> String {
        r#"role = "approver"

[custody]
api_key = ""
api_secret = ""
wallet_id = ""

[poll]
max_attempts = 15
interval_secs = 2

[runner]
round_interval_secs = 5

[chains]
# Sui = "opaque_payload"

# [[policies]]
# name = "small evm transfers"
# match_rules = [
#     { path = "chain", value = "ETH", rule = "exact" },
# ]
# verify_rules = [
#     { path = "payload.value", value = "1000000000000000000", rule = "lte" },
# ]
"#
        .to_string()
    }

    /// Returns a builder for a configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use apprgate_core::config::{Config, Role};
    ///
    /// let config = Config::builder()
    ///     .role(Role::Manager)
    ///     .round_interval_secs(30)
    ///     .build();
    ///
    /// assert_eq!(config.runner.round_interval_secs, 30);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the role.
    #[must_use]
    pub const fn role(mut self, role: Role) -> Self {
        self.config.role = role;
        self
    }

    /// Sets the custody credentials.
    #[must_use]
    pub fn credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.config.custody.api_key = api_key.into();
        self.config.custody.api_secret = api_secret.into();
        self
    }

    /// Sets the wallet id used for submissions.
    #[must_use]
    pub fn wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.config.custody.wallet_id = wallet_id.into();
        self
    }

    /// Sets the number of poll attempts.
    #[must_use]
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.poll.max_attempts = attempts;
        self
    }

    /// Sets the poll interval in seconds.
    #[must_use]
    pub const fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.config.poll.interval_secs = secs;
        self
    }

    /// Sets the round interval in seconds.
    #[must_use]
    pub const fn round_interval_secs(mut self, secs: u64) -> Self {
        self.config.runner.round_interval_secs = secs;
        self
    }

    /// Registers an extra chain name.
    #[must_use]
    pub fn chain(mut self, name: impl Into<String>, family: ChainFamily) -> Self {
        self.config.chains.insert(name.into(), family);
        self
    }

    /// Sets the descriptor the initiator submits.
    #[must_use]
    pub fn tx_info(mut self, tx_info: CanonicalTxInfo) -> Self {
        self.config.tx_info = Some(tx_info);
        self
    }

    /// Appends a policy.
    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.config.policies.push(policy);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::indexing_slicing,
        clippy::needless_raw_string_hashes
    )]

    use super::*;
    use crate::rules::{Rule, RuleKind};
    use crate::types::TransactionType;
    use crate::value::Value;

    fn sample_tx() -> CanonicalTxInfo {
        CanonicalTxInfo {
            chain: "ETH".to_string(),
            method: "eth_sendTransaction".to_string(),
            transaction_type: Some(TransactionType::Native),
            payload: Value::empty_map(),
            msg: None,
            recent_block_hash: None,
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.role, Role::Approver);
        assert_eq!(config.poll, PollConfig { max_attempts: 15, interval_secs: 2 });
        assert_eq!(config.runner.round_interval(), Duration::from_secs(5));
        assert!(config.chains.is_empty());
        assert!(config.policies.is_empty());
        assert!(config.tx_info.is_none());
    }

    #[test]
    fn test_default_toml_is_parseable() {
        let parsed: Config = toml::from_str(&Config::default_toml()).expect("should parse");
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization_empty_config() {
        let config: Config = toml::from_str("").expect("should parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toml_deserialization_full_config() {
        let toml_str = r#"
role = "initiator"

[custody]
api_key = "key"
api_secret = "secret"
wallet_id = "w-1"

[poll]
max_attempts = 3
interval_secs = 1

[runner]
round_interval_secs = 60

[chains]
Sui = "opaque_payload"
Base = "evm_like"

[tx_info]
chain = "ETH"
method = "eth_sendTransaction"
transactionType = "native"
payload = { to = "0xabc", value = "1" }

[[policies]]
name = "eth"
match_rules = [{ path = "chain", value = "ETH", rule = "exact" }]
verify_rules = [{ path = "payload.value", value = "10", rule = "lt" }]
"#;

        let config: Config = toml::from_str(toml_str).expect("should parse");
        assert_eq!(config.role, Role::Initiator);
        assert_eq!(config.custody.wallet_id, "w-1");
        assert_eq!(config.poll.interval(), Duration::from_secs(1));
        assert_eq!(config.chains.get("Sui"), Some(&ChainFamily::OpaquePayload));
        assert_eq!(config.chains.get("Base"), Some(&ChainFamily::EvmLike));
        assert_eq!(config.policies[0].verify_rules[0].kind, RuleKind::Lt);

        let tx = config.tx_info.as_ref().expect("tx_info present");
        assert_eq!(tx.payload.get("to").and_then(Value::as_str), Some("0xabc"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_rejects_unknown_family() {
        let result: Result<Config, _> = toml::from_str("[chains]\nFoo = \"quantum\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_serialization_roundtrip() {
        let config = Config::builder()
            .role(Role::Manager)
            .credentials("k", "s")
            .chain("Sui", ChainFamily::OpaquePayload)
            .policy(Policy::new(
                vec![Rule::new("chain", "Sui", RuleKind::Exact)],
                vec![],
            ))
            .build();

        let text = toml::to_string_pretty(&config).expect("should serialize");
        let parsed: Config = toml::from_str(&text).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_fails_for_zero_attempts() {
        let config = Config::builder().max_attempts(0).build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll.max_attempts"));
    }

    #[test]
    fn test_validate_fails_for_zero_round_interval() {
        let config = Config::builder().round_interval_secs(0).build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "runner.round_interval_secs"
        ));
    }

    #[test]
    fn test_validate_fails_for_empty_rule_path() {
        let config = Config::builder()
            .policy(Policy::new(vec![], vec![Rule::new("", "1", RuleKind::Eq)]))
            .build();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("policies[0].verify_rules[0].path"));
    }

    #[test]
    fn test_validate_policies_ignores_role() {
        let config = Config::builder().role(Role::Initiator).build();
        assert!(config.validate().is_err());
        assert!(config.validate_policies().is_ok());

        let config = Config::builder()
            .role(Role::Initiator)
            .policy(Policy::new(vec![Rule::new("", "x", RuleKind::Exact)], vec![]))
            .build();
        assert!(config
            .validate_policies()
            .unwrap_err()
            .to_string()
            .contains("policies[0].match_rules[0].path"));
    }

    #[test]
    fn test_validate_initiator_requires_wallet_and_tx() {
        let config = Config::builder().role(Role::Initiator).build();
        assert!(config.validate().unwrap_err().to_string().contains("custody.wallet_id"));

        let config = Config::builder().role(Role::Initiator).wallet_id("w").build();
        assert!(config.validate().unwrap_err().to_string().contains("tx_info"));

        let config = Config::builder()
            .role(Role::Initiator)
            .wallet_id("w")
            .tx_info(sample_tx())
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(Role::Initiator.to_string(), "initiator");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_custody_debug_hides_secret() {
        let config = Config::builder().credentials("key-1", "top-secret").build();
        let debug = format!("{:?}", config.custody);
        assert!(debug.contains("key-1"));
        assert!(!debug.contains("top-secret"));
    }
}
