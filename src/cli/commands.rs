//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Figma REST API client with rate-limit aware retries
#[derive(Parser, Debug)]
#[command(name = "figma-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Personal access token (overrides settings and FIGMA_ACCESS_TOKEN)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Base URL of the API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET a path and print the JSON response
    Get {
        /// Path relative to the base URL (e.g. files/<key>)
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Make a single attempt
        #[arg(long)]
        no_retry: bool,

        /// Total attempts when retrying
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Longest Retry-After to wait for, in seconds
        #[arg(long)]
        max_retry_after: Option<f64>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the effective client configuration
    Config,
}

/// Parse a `key=value` pair
pub(crate) fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
