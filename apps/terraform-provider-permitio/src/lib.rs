//! Command-line host for the Permit.io provider.
//!
//! Each subcommand drives a single resource or data source instance through
//! the provider using JSON configuration and state files.

pub mod commands;
pub mod error;
pub mod files;
pub mod logging;

pub use error::{CliError, CliResult};
