//! # Jira API Errors
//!
//! Failure taxonomy shared by every operation of the client. Callers match on
//! [`ErrorKind`] to decide whether a failure was their input, a change of
//! remote state, a missing permission, or the network.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by Jira when a request is rejected.
///
/// Jira reports problems as a list of free-form messages plus a map of
/// per-field messages keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCollection {
  #[serde(default)]
  pub error_messages: Vec<String>,
  #[serde(default)]
  pub errors: BTreeMap<String, String>,
  #[serde(default)]
  pub status: Option<u16>,
}

impl ErrorCollection {
  /// Build a collection holding a single free-form message.
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      error_messages: vec![message.into()],
      ..Default::default()
    }
  }

  /// Build a collection holding a single per-field message.
  pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = BTreeMap::new();
    errors.insert(field.into(), message.into());
    Self {
      errors,
      ..Default::default()
    }
  }

  /// Parse an error body, falling back to the raw text when it isn't JSON.
  pub fn from_body(status: StatusCode, body: &str) -> Self {
    let mut collection = match serde_json::from_str::<ErrorCollection>(body) {
      Ok(collection) => collection,
      Err(_) if body.trim().is_empty() => ErrorCollection::default(),
      Err(_) => ErrorCollection::message(body.trim()),
    };
    collection.status.get_or_insert(status.as_u16());
    collection
  }

  pub fn is_empty(&self) -> bool {
    self.error_messages.is_empty() && self.errors.is_empty()
  }
}

impl fmt::Display for ErrorCollection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .error_messages
      .iter()
      .cloned()
      .chain(self.errors.iter().map(|(field, message)| format!("{field}: {message}")))
      .collect();

    if parts.is_empty() {
      write!(f, "no details provided")
    } else {
      write!(f, "{}", parts.join(", "))
    }
  }
}

/// Fieldless discriminant of [`JiraError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  NotFound,
  PermissionDenied,
  Validation,
  Conflict,
  Transport,
}

/// Errors returned by the Jira client.
#[derive(Debug, Error)]
pub enum JiraError {
  /// The resource or locator no longer resolves.
  #[error("Resource not found: {message}")]
  NotFound { message: String },

  /// The caller is not authenticated, or authenticated but not allowed.
  #[error("Permission denied: {message}")]
  PermissionDenied { message: String },

  /// The input was malformed or missing required values.
  #[error("Validation failed: {details}")]
  Validation { details: ErrorCollection },

  /// The action is not valid for the current remote state.
  #[error("Conflict with current state: {message}")]
  Conflict { message: String },

  /// The exchange failed below the application layer.
  #[error("Transport error: {message}")]
  Transport {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
  },
}

/// Result type for Jira client operations.
pub type Result<T> = std::result::Result<T, JiraError>;

impl JiraError {
  /// Map a non-success HTTP status and its parsed body onto the taxonomy.
  pub fn from_status(status: StatusCode, details: ErrorCollection, context: &str) -> Self {
    let message = if details.is_empty() {
      context.to_string()
    } else {
      details.to_string()
    };

    match status.as_u16() {
      400 => JiraError::Validation { details },
      401 => JiraError::PermissionDenied {
        message: format!("Authentication failed ({message})"),
      },
      403 => JiraError::PermissionDenied { message },
      404 => JiraError::NotFound { message },
      409 => JiraError::Conflict { message },
      _ => JiraError::Transport {
        message: format!("HTTP {status}: {message}"),
        source: None,
      },
    }
  }

  /// Build a local validation failure for a single field.
  pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
    JiraError::Validation {
      details: ErrorCollection::field(field, message),
    }
  }

  /// Build a local validation failure with a free-form message.
  pub fn invalid(message: impl Into<String>) -> Self {
    JiraError::Validation {
      details: ErrorCollection::message(message),
    }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    JiraError::NotFound {
      message: message.into(),
    }
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    JiraError::Conflict {
      message: message.into(),
    }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    JiraError::Transport {
      message: message.into(),
      source: None,
    }
  }

  pub fn transport_with<E>(message: impl Into<String>, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    JiraError::Transport {
      message: message.into(),
      source: Some(Box::new(source)),
    }
  }

  /// Reinterpret a server-side rejection as a state conflict.
  ///
  /// Used by operations whose only input is the current remote state, such
  /// as voting: a 400 there means "not valid now", not "malformed request".
  pub fn into_state_conflict(self) -> Self {
    match self {
      JiraError::Validation { details } => JiraError::Conflict {
        message: details.to_string(),
      },
      other => other,
    }
  }

  pub const fn kind(&self) -> ErrorKind {
    match self {
      JiraError::NotFound { .. } => ErrorKind::NotFound,
      JiraError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
      JiraError::Validation { .. } => ErrorKind::Validation,
      JiraError::Conflict { .. } => ErrorKind::Conflict,
      JiraError::Transport { .. } => ErrorKind::Transport,
    }
  }

  /// Only transport failures are worth retrying unchanged.
  pub const fn is_retryable(&self) -> bool {
    matches!(self, JiraError::Transport { .. })
  }

  /// Server-provided details for validation failures.
  pub const fn validation_details(&self) -> Option<&ErrorCollection> {
    match self {
      JiraError::Validation { details } => Some(details),
      _ => None,
    }
  }
}

impl From<reqwest::Error> for JiraError {
  fn from(err: reqwest::Error) -> Self {
    let message = if err.is_timeout() {
      "Request timed out".to_string()
    } else if err.is_connect() {
      "Failed to connect to Jira".to_string()
    } else {
      "HTTP exchange failed".to_string()
    };
    JiraError::transport_with(message, err)
  }
}
