//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Settings;
use crate::endpoint::{JsonEndpoint, RequestSpec};
use crate::error::{Error, Result};
use crate::http::{Client, ClientConfig};
use crate::retry::RetryPolicy;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.client_config()?;

        match &self.cli.command {
            Commands::Get {
                path,
                query,
                no_retry,
                max_attempts,
                max_retry_after,
                compact,
            } => {
                let policy =
                    retry_policy(&config.retry, *no_retry, *max_attempts, *max_retry_after)?;
                let body = get(config, path, query, &policy).await?;
                print_json(&body, *compact)
            }
            Commands::Config => {
                println!("{config:#?}");
                Ok(())
            }
        }
    }

    /// Resolve settings file, environment and flags into a client config
    pub fn client_config(&self) -> Result<ClientConfig> {
        let settings = match &self.cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let mut settings = settings.with_env_overrides();

        if let Some(ref token) = self.cli.token {
            settings.access_token = Some(token.clone());
        }
        if let Some(ref url) = self.cli.base_url {
            settings.base_url = Some(url.clone());
        }
        if let Some(secs) = self.cli.timeout {
            settings.timeout_seconds = Some(secs);
        }

        settings.into_client_config()
    }
}

async fn get(
    config: ClientConfig,
    path: &str,
    query: &[(String, String)],
    policy: &RetryPolicy,
) -> Result<Value> {
    if config.access_token.is_none() {
        return Err(Error::config(
            "No access token (use --token or set FIGMA_ACCESS_TOKEN)",
        ));
    }

    let client = Client::new(config)?;
    info!(
        "GET {} (up to {} attempts)",
        client.build_url(path)?,
        policy.max_attempts
    );

    let mut spec = RequestSpec::get(path);
    for (key, value) in query {
        spec = spec.query(key.as_str(), value.as_str());
    }
    let result = client
        .request_with_policy(&JsonEndpoint::<Value>::new(spec), policy)
        .await;
    if let Err(ref err) = result {
        if err.is_retryable() {
            warn!(
                "Gave up after {} attempts; raise --max-attempts or try again later",
                policy.max_attempts
            );
        }
    }
    result
}

/// Apply command-line retry flags on top of the configured policy
fn retry_policy(
    base: &RetryPolicy,
    no_retry: bool,
    max_attempts: Option<u32>,
    max_retry_after: Option<f64>,
) -> Result<RetryPolicy> {
    let mut policy = *base;
    if let Some(attempts) = max_attempts {
        policy.max_attempts = attempts;
    }
    if no_retry {
        policy.max_attempts = 1;
    }
    if let Some(secs) = max_retry_after {
        policy.max_retry_after = Duration::try_from_secs_f64(secs)
            .map_err(|e| Error::config(format!("invalid --max-retry-after: {e}")))?;
    }
    Ok(policy)
}

fn print_json(value: &Value, compact: bool) -> Result<()> {
    let output = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{output}");
    Ok(())
}
