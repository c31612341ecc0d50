//! Staking dashboard CLI library.
//!
//! This crate provides the CLI interface over the staking ledger.

mod cli;
pub mod commands;
mod config;
pub mod format;

pub use cli::{Cli, Commands};
pub use config::Config;
