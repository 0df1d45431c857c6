//! Command implementations.
//!
//! Each command is a small struct built from the parsed arguments with a
//! `run` method that performs the work and prints to stdout.

pub mod config;
pub mod evaluate;
pub mod exit_codes;
pub mod init;
pub mod normalize;

pub use config::ConfigCommand;
pub use evaluate::{EvaluateCommand, EvaluateError, EvaluateInput};
pub use init::{InitCommand, InitError};
pub use normalize::NormalizeCommand;
