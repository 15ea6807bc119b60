//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource: issues, bulk creation,
//! lifecycle transitions, field edits, watchers and votes, comments and
//! worklogs, metadata and users.

pub mod bulk;
pub mod collaboration;
pub mod fields;
pub mod issues;
pub mod metadata;
pub mod social;
pub mod transitions;
pub mod users;

use crate::error::{JiraError, Result};

/// Reject blank issue keys before they turn into a request for the
/// collection itself.
pub(crate) fn require_key(key: &str) -> Result<&str> {
  let key = key.trim();
  if key.is_empty() {
    return Err(JiraError::invalid_field("issueKey", "Issue key cannot be empty"));
  }
  Ok(key)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  #[test]
  fn test_require_key() {
    assert_eq!(require_key(" TEST-1 ").unwrap(), "TEST-1");
    assert_eq!(require_key("  ").unwrap_err().kind(), ErrorKind::Validation);
  }
}
