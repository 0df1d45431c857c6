//! # CLI Argument Definitions
//!
//! - `apprgate init [--force]` - Write a default configuration file
//! - `apprgate config [path|validate]` - Show, locate or validate the configuration
//! - `apprgate normalize --chain <CHAIN> [--intent <INTENT>] <PAYLOAD>` - Print the canonical descriptor
//! - `apprgate evaluate [--chain <CHAIN>] [--intent <INTENT>] <FILE>` - Run the policy set on a descriptor
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level
//! - `-c, --config <PATH>` - Path to configuration file
//! - `--log-format <FORMAT>` - Log output format

use std::path::PathBuf;

use apprgate_core::types::Intent;
use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::LogFormat;

/// Policy-driven approval gate for custodial multi-chain wallets.
#[derive(Debug, Parser)]
#[command(name = "apprgate")]
#[command(author, version, about = "Policy-driven approval gate for custodial wallets")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    ///
    /// Defaults to `~/.apprgate/config.toml`.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, default_value = "compact", value_name = "FORMAT")]
    pub log_format: LogFormatArg,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the configuration
    ///
    /// Without a subcommand, prints the loaded configuration as TOML.
    Config {
        /// Configuration action to perform
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Normalize a raw transaction or message and print the descriptor as JSON
    Normalize {
        /// Chain name (e.g. Solana, ETH, BenfenTEST)
        #[arg(long, value_name = "CHAIN")]
        chain: String,

        /// What the payload is for
        #[arg(short, long, default_value = "send", value_name = "INTENT")]
        intent: IntentArg,

        /// Raw payload: base64 (Solana), JSON object (EVM), opaque string (Benfen),
        /// or a message for `--intent sign-message`
        #[arg(value_name = "PAYLOAD")]
        payload: String,
    },

    /// Evaluate the configured policies against a descriptor
    ///
    /// Exits 0 on approve or skip and 1 on reject.
    Evaluate {
        /// File holding a JSON descriptor, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Treat the input as a raw payload for this chain and normalize it first
        #[arg(long, value_name = "CHAIN")]
        chain: Option<String>,

        /// Intent used with `--chain`
        #[arg(short, long, default_value = "send", value_name = "INTENT")]
        intent: IntentArg,
    },
}

/// Configuration-related actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,

    /// Validate the configuration and report policy warnings
    Validate,
}

/// Intent accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IntentArg {
    /// Sign and broadcast
    #[default]
    Send,
    /// Sign without broadcasting
    SignOnly,
    /// Sign a message
    SignMessage,
}

impl From<IntentArg> for Intent {
    fn from(arg: IntentArg) -> Self {
        match arg {
            IntentArg::Send => Self::Send,
            IntentArg::SignOnly => Self::SignOnly,
            IntentArg::SignMessage => Self::SignMessage,
        }
    }
}

/// Log format accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Multi-line
    Pretty,
    /// JSON lines
    Json,
    /// Single line
    #[default]
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Compact => Self::Compact,
        }
    }
}
