//! # Client Construction
//!
//! Builds the Jira client and the runtime that drives it from the
//! environment and `~/.netrc`.

use anyhow::{Context, Result};
use jira_rest::{JiraClient, JiraConfig};
use tokio::runtime::Runtime;
use tracing::debug;

/// Create a runtime and a Jira client configured from the environment.
pub fn create_jira_runtime_and_client() -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let config = JiraConfig::from_env().context("Failed to resolve Jira configuration")?;
  debug!("Using Jira host {}", config.base_url);

  let client = JiraClient::from_config(&config).context("Failed to create Jira client")?;
  Ok((rt, client))
}
