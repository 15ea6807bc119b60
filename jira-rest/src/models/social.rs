//! Watchers, votes, comments, worklogs and attachments.

use serde::{Deserialize, Serialize};

use super::de_id;
use crate::models::User;

/// Full watcher list of an issue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchers {
  #[serde(default)]
  pub is_watching: bool,
  #[serde(default)]
  pub watch_count: u32,
  #[serde(default)]
  pub watchers: Vec<User>,
}

/// Full voter list of an issue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Votes {
  #[serde(default)]
  pub votes: u32,
  #[serde(default)]
  pub has_voted: bool,
  #[serde(default)]
  pub voters: Vec<User>,
}

/// Restricts who can see a comment or worklog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
  #[serde(rename = "type")]
  pub kind: VisibilityKind,
  pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityKind {
  Role,
  Group,
}

impl Visibility {
  pub fn role(name: &str) -> Self {
    Self {
      kind: VisibilityKind::Role,
      value: name.to_string(),
    }
  }

  pub fn group(name: &str) -> Self {
    Self {
      kind: VisibilityKind::Group,
      value: name.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  #[serde(deserialize_with = "de_id")]
  pub id: u64,
  #[serde(default)]
  pub body: String,
  pub author: Option<User>,
  pub created: Option<String>,
  pub updated: Option<String>,
  pub visibility: Option<Visibility>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentPage {
  #[serde(default)]
  pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
  #[serde(deserialize_with = "de_id")]
  pub id: u64,
  pub author: Option<User>,
  pub comment: Option<String>,
  pub started: Option<String>,
  pub time_spent: Option<String>,
  #[serde(default)]
  pub time_spent_seconds: u64,
  pub visibility: Option<Visibility>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorklogPage {
  #[serde(default)]
  pub worklogs: Vec<Worklog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
  #[serde(deserialize_with = "de_id")]
  pub id: u64,
  pub filename: String,
  #[serde(default)]
  pub size: u64,
  pub mime_type: Option<String>,
  pub content: Option<String>,
  pub author: Option<User>,
}
