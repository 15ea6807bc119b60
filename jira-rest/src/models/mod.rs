//! Data models for Jira API requests and responses.

use serde::{Deserialize, Deserializer};

pub mod bulk;
pub mod input;
pub mod issue;
pub mod locator;
pub mod metadata;
pub mod social;
pub mod transition;

pub use bulk::BulkOperationResult;
pub use input::{
  AdjustEstimate, Assignee, CommentInput, FieldKey, IssueInput, LinkIssuesInput, Page, StandardField, TransitionInput,
  WorklogInput,
};
pub use issue::{
  BasicIssue, BasicProject, CUSTOM_FIELD_PREFIX, CustomField, Issue, IssueLink, IssueLinkType, IssueType, Priority,
  Status, StatusCategory, User, VoteSummary, WatchSummary,
};
pub use locator::{IssueTarget, ResourceLocator};
pub use metadata::{CimIssueType, CimProject, EditMetadata, FieldInfo, FieldSchema, GetCreateIssueMetadataOptions};
pub use social::{Attachment, Comment, Visibility, VisibilityKind, Votes, Watchers, Worklog};
pub use transition::Transition;

/// Authentication credentials for Jira API
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

impl std::fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("api_token", &"<redacted>")
      .finish()
  }
}

/// Jira sends numeric ids as strings in most places and as numbers in a few.
pub(crate) fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Number(u64),
    Text(String),
  }

  match RawId::deserialize(deserializer)? {
    RawId::Number(id) => Ok(id),
    RawId::Text(text) => text
      .trim()
      .parse()
      .map_err(|_| serde::de::Error::custom(format!("invalid numeric id '{text}'"))),
  }
}
