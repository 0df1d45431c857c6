//! # Evaluate Command
//!
//! `apprgate evaluate [--chain <CHAIN>] [--intent <INTENT>] <FILE>` runs the
//! configured policy set against a descriptor, the way the approver round
//! would, without contacting the custody service.
//!
//! The input is a JSON descriptor unless `--chain` is given, in which case it
//! is a raw payload that is normalized first.

use std::io::Read;
use std::path::PathBuf;

use apprgate_core::config::Config;
use apprgate_core::error::{ConfigError, NormalizeError};
use apprgate_core::types::Intent;
use apprgate_core::value::Value;
use apprgate_policy::{PolicyDecision, PolicyMatcher, PolicySet};

use super::exit_codes::{EXIT_REJECTED, EXIT_SUCCESS};
use super::normalize::normalizer;

/// Errors from `apprgate evaluate`.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// The input could not be read.
    #[error("failed to read {source_name}: {source}")]
    Read {
        /// File name or `<stdin>`.
        source_name: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not a JSON descriptor.
    #[error("input is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The raw payload could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where the descriptor comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluateInput {
    /// Read standard input.
    Stdin,
    /// Read this file.
    File(PathBuf),
}

impl EvaluateInput {
    /// Parses the command-line form, where `-` means stdin.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    fn read(&self) -> Result<String, EvaluateError> {
        match self {
            Self::Stdin => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .map_err(|source| EvaluateError::Read {
                        source_name: "<stdin>".to_string(),
                        source,
                    })?;
                Ok(content)
            }
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(|source| EvaluateError::Read {
                    source_name: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

/// The `apprgate evaluate` command handler.
#[derive(Debug, Clone)]
pub struct EvaluateCommand {
    /// Descriptor source.
    pub input: EvaluateInput,
    /// Normalize the input for this chain first.
    pub chain: Option<String>,
    /// Intent used when normalizing.
    pub intent: Intent,
}

impl EvaluateCommand {
    /// Create a new `EvaluateCommand`.
    #[must_use]
    pub const fn new(input: EvaluateInput, chain: Option<String>, intent: Intent) -> Self {
        Self {
            input,
            chain,
            intent,
        }
    }

    /// Reads the input, decides it and prints the decision.
    ///
    /// Returns the process exit code: [`EXIT_REJECTED`] on reject,
    /// [`EXIT_SUCCESS`] on approve or skip.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError`] if the input cannot be read, parsed or
    /// normalized, or the policies are invalid. Role settings are not
    /// checked.
    pub fn run(&self, config: &Config) -> Result<i32, EvaluateError> {
        config.validate_policies()?;
        let content = self.input.read()?;
        let decision = self.evaluate(config, &content)?;

        println!("{}", describe(config, decision));
        Ok(exit_code(decision))
    }

    /// Decides `content` against the configured policies.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError`] if `content` cannot be parsed or normalized.
    pub fn evaluate(&self, config: &Config, content: &str) -> Result<PolicyDecision, EvaluateError> {
        let tree = match &self.chain {
            Some(chain) => normalizer(config)
                .normalize(chain, content.trim(), self.intent)?
                .to_value(),
            None => Value::from(serde_json::from_str::<serde_json::Value>(content)?),
        };

        let policies = PolicySet::new(config.policies.clone());
        Ok(policies.decide(&tree))
    }
}

fn describe(config: &Config, decision: PolicyDecision) -> String {
    let label = |index: usize| {
        config
            .policies
            .get(index)
            .map_or_else(|| index.to_string(), |p| p.label(index))
    };

    match decision {
        PolicyDecision::Skip => "skip: no policy matched".to_string(),
        PolicyDecision::Approve { policy } => format!("approve: policy {}", label(policy)),
        PolicyDecision::Reject {
            policy,
            failed_rule,
        } => {
            let rule = config
                .policies
                .get(policy)
                .and_then(|p| p.verify_rules.get(failed_rule))
                .map_or_else(String::new, |r| format!(" (`{r}`)"));
            format!(
                "reject: policy {}, verify rule {failed_rule} failed{rule}",
                label(policy)
            )
        }
    }
}

const fn exit_code(decision: PolicyDecision) -> i32 {
    match decision {
        PolicyDecision::Reject { .. } => EXIT_REJECTED,
        PolicyDecision::Skip | PolicyDecision::Approve { .. } => EXIT_SUCCESS,
    }
}
