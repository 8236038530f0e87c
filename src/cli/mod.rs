//! CLI module
//!
//! Command-line interface for issuing Figma API requests.
//!
//! # Commands
//!
//! - `get` - GET a path and print the JSON response
//! - `config` - Show the effective client configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
