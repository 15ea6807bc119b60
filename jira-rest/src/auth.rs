//! Credential lookup in `.netrc` files.
//!
//! Jira credentials are looked up for the configured host first and then for
//! the shared `atlassian.net` machine entry, so one token can serve every
//! Atlassian Cloud site.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ConfigError;

/// Machine entry used when the host itself has no credentials
pub const FALLBACK_MACHINE: &str = "atlassian.net";

/// Login and password pair read from `.netrc`
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

/// Returns the path to the `.netrc` file for the provided home directory.
pub fn netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Strip scheme, path and trailing slash so a base URL matches a machine name.
pub fn normalize_host(raw_host: &str) -> String {
  let without_scheme = raw_host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://");
  without_scheme
    .split('/')
    .next()
    .unwrap_or(without_scheme)
    .to_string()
}

/// Find the credentials for `machine` in `.netrc` content.
///
/// Both the single-line (`machine host login user password pass`) and the
/// multi-line layout are accepted. Entries missing a login or password are
/// skipped.
pub fn parse_netrc(content: &str, machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut current: Option<&str> = None;
  let mut username: Option<&str> = None;
  let mut password: Option<&str> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" | "default" => {
        if let Some(found) = complete(machine, current, username, password) {
          return Some(found);
        }
        current = if token == "machine" { tokens.next() } else { None };
        username = None;
        password = None;
      }
      "login" => username = tokens.next(),
      "password" => password = tokens.next(),
      _ => {}
    }
  }

  complete(machine, current, username, password)
}

fn complete(machine: &str, current: Option<&str>, username: Option<&str>, password: Option<&str>) -> Option<Credentials> {
  match (current, username, password) {
    (Some(name), Some(username), Some(password)) if name == machine => Some(Credentials {
      username: username.to_string(),
      password: password.to_string(),
    }),
    _ => None,
  }
}

/// Read credentials for `machine` from a `.netrc` file. A missing file has no
/// credentials.
pub fn read_netrc_credentials(path: &Path, machine: &str) -> Result<Option<Credentials>, ConfigError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(parse_netrc(&content, machine)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(ConfigError::Netrc {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Retrieve Jira credentials for the host, falling back to `atlassian.net`.
pub fn get_jira_credentials(home: &Path, jira_host: &str) -> Result<Credentials, ConfigError> {
  let path = netrc_path(home);
  let normalized_host = normalize_host(jira_host);

  for machine in [normalized_host.as_str(), FALLBACK_MACHINE] {
    if let Some(creds) = read_netrc_credentials(&path, machine)? {
      debug!("Using .netrc credentials for machine '{}'", machine);
      return Ok(creds);
    }
  }

  Err(ConfigError::MissingCredentials { host: normalized_host })
}
