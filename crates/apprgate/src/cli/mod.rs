//! Command-line interface.
//!
//! [`args`] holds the clap definitions; [`commands`] the handlers.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConfigAction, IntentArg, LogFormatArg};
