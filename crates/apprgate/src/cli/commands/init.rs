//! # Init Command
//!
//! `apprgate init [--force]` writes the default configuration, with commented
//! examples, to the configuration path.

use apprgate_core::config_loader::ConfigLoader;
use apprgate_core::error::ConfigError;

/// Errors from `apprgate init`.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// A configuration file exists and `--force` was not given.
    #[error("configuration already exists at {0}; use --force to overwrite")]
    AlreadyInitialized(String),

    /// The file could not be written.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The `apprgate init` command handler.
#[derive(Debug, Clone, Copy)]
pub struct InitCommand {
    /// Overwrite an existing configuration.
    pub force: bool,
}

impl InitCommand {
    /// Create a new `InitCommand`.
    #[must_use]
    pub const fn new(force: bool) -> Self {
        Self { force }
    }

    /// Writes the default configuration through `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::AlreadyInitialized`] if the file exists and `force`
    /// is not set, or the write error.
    pub fn run(&self, loader: &ConfigLoader) -> Result<(), InitError> {
        let path = loader.config_path();

        if loader.exists() && !self.force {
            return Err(InitError::AlreadyInitialized(path.display().to_string()));
        }

        loader.write_default()?;
        tracing::info!(path = %path.display(), "wrote default configuration");

        println!("Configuration written to {}", path.display());
        println!();
        println!("Next steps:");
        println!("  1. Fill in [custody] api_key, api_secret and wallet_id");
        println!("  2. Choose a role and add [[policies]]");
        println!("  3. Check it with: apprgate config validate");

        Ok(())
    }
}
