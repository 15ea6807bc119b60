//! # Connection Configuration
//!
//! Resolves the Jira base URL, credentials and timeout from environment
//! variables, with `.netrc` as the credential fallback.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;
use url::Url;

use crate::auth::{FALLBACK_MACHINE, get_jira_credentials};
use crate::consts::DEFAULT_TIMEOUT_SECS;
use crate::models::JiraAuth;

/// Environment variable storing the Jira host configuration.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";
/// Environment variable storing the Jira username.
pub const ENV_JIRA_USER: &str = "JIRA_USER";
/// Environment variable storing the Jira API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_JIRA_TIMEOUT_SECS: &str = "JIRA_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Jira host environment variable '{ENV_JIRA_HOST}' not set")]
  MissingHost,

  #[error("Invalid Jira host '{host}': {reason}")]
  InvalidHost { host: String, reason: String },

  #[error(
    "Jira credentials not found. Set {ENV_JIRA_USER} and {ENV_JIRA_API_TOKEN}, or add a .netrc entry for machine '{host}' or '{FALLBACK_MACHINE}'."
  )]
  MissingCredentials { host: String },

  #[error("Invalid {ENV_JIRA_TIMEOUT_SECS} value '{value}': expected a positive number of seconds")]
  InvalidTimeout { value: String },

  #[error("Failed to read {}", path.display())]
  Netrc {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Ensure a host has a proper scheme, assuming https:// when it has none.
pub fn ensure_url_scheme(input: &str) -> Result<Url, ConfigError> {
  let trimmed = input.trim();
  let invalid = |reason: &str| ConfigError::InvalidHost {
    host: input.to_string(),
    reason: reason.to_string(),
  };

  if trimmed.is_empty() {
    return Err(invalid("host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let url = Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
  if url.host().is_none() {
    return Err(invalid("no host name"));
  }
  Ok(url)
}

/// Everything needed to open a connection to one Jira instance
#[derive(Clone)]
pub struct JiraConfig {
  pub base_url: Url,
  pub username: String,
  pub api_token: String,
  pub timeout: Duration,
}

impl std::fmt::Debug for JiraConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JiraConfig")
      .field("base_url", &self.base_url.as_str())
      .field("username", &self.username)
      .field("api_token", &"<redacted>")
      .field("timeout", &self.timeout)
      .finish()
  }
}

impl JiraConfig {
  /// Resolve configuration from the process environment and `~/.netrc`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    Self::from_lookup(|key| std::env::var(key).ok(), home.as_deref())
  }

  /// Resolve configuration from an arbitrary variable lookup.
  ///
  /// Explicit `JIRA_USER`/`JIRA_API_TOKEN` win; otherwise `.netrc` under
  /// `home` is consulted for the host and then for `atlassian.net`.
  pub fn from_lookup<F>(lookup: F, home: Option<&Path>) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let host = non_empty(ENV_JIRA_HOST).ok_or(ConfigError::MissingHost)?;
    let base_url = ensure_url_scheme(&host)?;

    let timeout = match non_empty(ENV_JIRA_TIMEOUT_SECS) {
      Some(raw) => match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => return Err(ConfigError::InvalidTimeout { value: raw }),
      },
      None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    };

    let (username, api_token) = match (non_empty(ENV_JIRA_USER), non_empty(ENV_JIRA_API_TOKEN)) {
      (Some(username), Some(api_token)) => (username, api_token),
      _ => {
        let host_name = base_url.host_str().unwrap_or_default().to_string();
        let home = home.ok_or(ConfigError::MissingCredentials { host: host_name })?;
        let creds = get_jira_credentials(home, base_url.as_str())?;
        (creds.username, creds.password)
      }
    };

    Ok(Self {
      base_url,
      username,
      api_token,
      timeout,
    })
  }

  pub fn auth(&self) -> JiraAuth {
    JiraAuth {
      username: self.username.clone(),
      api_token: self.api_token.clone(),
    }
  }
}
