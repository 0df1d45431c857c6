//! # Config Command
//!
//! ```text
//! apprgate config            # print the loaded configuration as TOML
//! apprgate config path       # print the configuration file path
//! apprgate config validate   # validate and list policy warnings
//! ```

use apprgate_core::config::Config;
use apprgate_core::config_loader::ConfigLoader;
use apprgate_core::error::ConfigError;
use apprgate_policy::{PolicySet, PolicyWarning};

use crate::cli::args::ConfigAction;

/// The `apprgate config` command handler.
#[derive(Debug, Clone, Copy)]
pub struct ConfigCommand {
    /// The action to perform (`None` prints the configuration).
    pub action: Option<ConfigAction>,
}

impl ConfigCommand {
    /// Create a new `ConfigCommand`.
    #[must_use]
    pub const fn new(action: Option<ConfigAction>) -> Self {
        Self { action }
    }

    /// Runs the command against the file behind `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] when there is no file to show or
    /// validate, and load or validation errors otherwise.
    pub fn run(&self, loader: &ConfigLoader) -> Result<(), ConfigError> {
        match self.action {
            None => {
                let config = loader.load_required()?;
                println!("{}", render(&config)?);
            }
            Some(ConfigAction::Path) => println!("{}", loader.config_path().display()),
            Some(ConfigAction::Validate) => {
                let config = loader.load_required()?;
                let warnings = validate(&config)?;
                for warning in &warnings {
                    println!("warning: {warning}");
                }
                println!(
                    "{}: ok ({} policies, {} warnings)",
                    loader.config_path().display(),
                    config.policies.len(),
                    warnings.len()
                );
            }
        }
        Ok(())
    }
}

/// Serializes `config` as pretty TOML.
fn render(config: &Config) -> Result<String, ConfigError> {
    toml::to_string_pretty(config)
        .map_err(|e| ConfigError::parse_failed(format!("failed to serialize configuration: {e}")))
}

/// Validates `config` and returns the policy warnings.
fn validate(config: &Config) -> Result<Vec<PolicyWarning>, ConfigError> {
    config.validate()?;
    Ok(PolicySet::new(config.policies.clone()).validate())
}
