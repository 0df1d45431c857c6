//! # apprgate
//!
//! Policy-driven approval gate for custodial multi-chain wallets.
//!
//! ## Usage
//!
//! ```bash
//! # Write a default configuration
//! apprgate init
//!
//! # Check the configuration and its policies
//! apprgate config validate
//!
//! # Print the canonical descriptor for a raw EVM transaction
//! apprgate normalize --chain ETH '{"to":"0x...","value":"1"}'
//!
//! # Decide a descriptor against the configured policies
//! apprgate evaluate tx.json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use apprgate::cli::commands::exit_codes::{EXIT_ERROR, EXIT_INVALID_INPUT, EXIT_SUCCESS};
use apprgate::cli::commands::{
    ConfigCommand, EvaluateCommand, EvaluateError, EvaluateInput, InitCommand, InitError,
    NormalizeCommand,
};
use apprgate::cli::{Cli, Commands};
use apprgate::logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard};
use apprgate_core::config_loader::ConfigLoader;
use apprgate_core::error::{ApprovalGateError, ConfigError};
use clap::Parser;

/// Set up logging based on verbosity level and format.
///
/// # Errors
///
/// Returns [`LogError`] if logging initialization fails.
fn setup_logging(verbose: u8, format: LogFormat) -> Result<LogGuard, LogError> {
    let config = LogConfig {
        level: verbosity_to_level(verbose),
        format,
        file_path: None,
        correlation_ids: true,
    };
    init_logging(&config)
}

/// Failure of a command, carrying its exit code.
#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Gate(#[from] ApprovalGateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}

impl CommandError {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Gate(e) => e.exit_code(),
            Self::Evaluate(EvaluateError::Normalize(_)) => EXIT_INVALID_INPUT,
            Self::Config(_) | Self::Init(_) | Self::Evaluate(_) => EXIT_ERROR,
        }
    }
}

/// The loader for `--config`, or the default location.
fn loader(cli: &Cli) -> Result<ConfigLoader, ConfigError> {
    match &cli.config {
        Some(path) => Ok(ConfigLoader::for_file(path)),
        None => ConfigLoader::new(),
    }
}

/// Main entry point for the `apprgate` application.
fn main() {
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.verbose, cli.log_format.into()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}

/// Dispatch to command handlers, returning the exit code.
fn run(cli: &Cli) -> Result<i32, CommandError> {
    let loader = loader(cli)?;

    match &cli.command {
        Commands::Init { force } => InitCommand::new(*force).run(&loader)?,
        Commands::Config { action } => ConfigCommand::new(*action).run(&loader)?,
        Commands::Normalize {
            chain,
            intent,
            payload,
        } => {
            let config = loader.load()?;
            NormalizeCommand::new(chain.as_str(), (*intent).into(), payload.as_str())
                .run(&config)?;
        }
        Commands::Evaluate {
            input,
            chain,
            intent,
        } => {
            let config = loader.load()?;
            let cmd = EvaluateCommand::new(
                EvaluateInput::parse(input),
                chain.clone(),
                (*intent).into(),
            );
            return Ok(cmd.run(&config)?);
        }
    }

    Ok(EXIT_SUCCESS)
}
