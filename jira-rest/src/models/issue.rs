//! Issue representations returned by the server.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use super::de_id;
use crate::models::ResourceLocator;
use crate::models::locator::{de_locator, de_opt_locator};

/// Prefix Jira uses for the ids of instance-specific fields
pub const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// Represents a Jira user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub name: Option<String>,
  pub key: Option<String>,
  pub account_id: Option<String>,
  #[serde(default)]
  pub display_name: String,
  pub email_address: Option<String>,
  #[serde(default = "default_active")]
  pub active: bool,
}

const fn default_active() -> bool {
  true
}

impl User {
  /// Whether `id` is this user's username, key or account id
  pub fn identifies(&self, id: &str) -> bool {
    [&self.name, &self.key, &self.account_id]
      .into_iter()
      .any(|candidate| candidate.as_deref() == Some(id))
  }
}

/// Represents a Jira issue status
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
  pub id: Option<String>,
  pub name: String,
  pub status_category: Option<StatusCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusCategory {
  pub key: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueType {
  pub id: Option<String>,
  pub name: String,
  #[serde(default)]
  pub subtask: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BasicProject {
  pub id: Option<String>,
  pub key: String,
  pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Priority {
  pub id: Option<String>,
  pub name: String,
}

/// Minimal issue reference, as returned by creation and embedded in links
/// and subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BasicIssue {
  #[serde(deserialize_with = "de_id")]
  pub id: u64,
  pub key: String,
  #[serde(rename = "self", deserialize_with = "de_locator")]
  locator: ResourceLocator,
}

impl BasicIssue {
  pub const fn locator(&self) -> &ResourceLocator {
    &self.locator
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueLinkType {
  pub name: String,
  pub inward: Option<String>,
  pub outward: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
  pub id: Option<String>,
  #[serde(rename = "type")]
  pub link_type: IssueLinkType,
  pub inward_issue: Option<BasicIssue>,
  pub outward_issue: Option<BasicIssue>,
}

/// Vote counters embedded in an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
  #[serde(default)]
  pub votes: u32,
  #[serde(default)]
  pub has_voted: bool,
}

/// Watch counters embedded in an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSummary {
  #[serde(default)]
  pub watch_count: u32,
  #[serde(default)]
  pub is_watching: bool,
}

/// Value of an instance-specific field, resolved to its display name
#[derive(Debug, Clone, PartialEq)]
pub struct CustomField {
  pub id: String,
  pub name: String,
  pub value: Value,
}

/// Locators of the collections hanging off one issue
#[derive(Debug, Clone, PartialEq, Eq)]
struct IssueLocators {
  this: ResourceLocator,
  watchers: ResourceLocator,
  votes: ResourceLocator,
  comments: ResourceLocator,
  worklog: ResourceLocator,
  transitions: ResourceLocator,
  attachments: ResourceLocator,
  edit_metadata: ResourceLocator,
  assignee: ResourceLocator,
}

/// A Jira issue as fetched from the server.
///
/// Snapshots are never updated by this crate; every mutation goes to the
/// server and the caller re-fetches to observe the result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawIssue")]
pub struct Issue {
  pub id: u64,
  pub key: String,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub status: Option<Status>,
  pub issue_type: Option<IssueType>,
  pub project: Option<BasicProject>,
  pub priority: Option<Priority>,
  pub assignee: Option<User>,
  pub reporter: Option<User>,
  pub labels: BTreeSet<String>,
  pub subtasks: Vec<BasicIssue>,
  pub issue_links: Vec<IssueLink>,
  pub votes: Option<VoteSummary>,
  pub watches: Option<WatchSummary>,
  /// Every standard (non-custom) field, as returned
  pub fields: BTreeMap<String, Value>,
  /// Custom fields keyed by display name
  pub custom_fields: BTreeMap<String, CustomField>,
  locators: IssueLocators,
}

impl Issue {
  pub const fn self_locator(&self) -> &ResourceLocator {
    &self.locators.this
  }

  pub const fn watchers_locator(&self) -> &ResourceLocator {
    &self.locators.watchers
  }

  pub const fn votes_locator(&self) -> &ResourceLocator {
    &self.locators.votes
  }

  pub const fn comments_locator(&self) -> &ResourceLocator {
    &self.locators.comments
  }

  pub const fn worklog_locator(&self) -> &ResourceLocator {
    &self.locators.worklog
  }

  pub const fn transitions_locator(&self) -> &ResourceLocator {
    &self.locators.transitions
  }

  pub const fn attachments_locator(&self) -> &ResourceLocator {
    &self.locators.attachments
  }

  pub const fn edit_metadata_locator(&self) -> &ResourceLocator {
    &self.locators.edit_metadata
  }

  pub const fn assignee_locator(&self) -> &ResourceLocator {
    &self.locators.assignee
  }

  pub fn has_label(&self, label: &str) -> bool {
    self.labels.contains(label)
  }

  pub fn custom_field(&self, name: &str) -> Option<&CustomField> {
    self.custom_fields.get(name)
  }

  pub fn custom_field_by_id(&self, id: &str) -> Option<&CustomField> {
    self.custom_fields.values().find(|field| field.id == id)
  }
}

#[derive(Deserialize)]
struct RawIssue {
  #[serde(deserialize_with = "de_id")]
  id: u64,
  key: String,
  #[serde(rename = "self", deserialize_with = "de_locator")]
  locator: ResourceLocator,
  #[serde(default)]
  names: BTreeMap<String, String>,
  #[serde(default)]
  fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct SelfLink {
  #[serde(rename = "self", default, deserialize_with = "de_opt_locator")]
  locator: Option<ResourceLocator>,
}

fn typed<T: DeserializeOwned>(fields: &Map<String, Value>, id: &str) -> Result<Option<T>, String> {
  match fields.get(id) {
    None | Some(Value::Null) => Ok(None),
    Some(value) => T::deserialize(value)
      .map(Some)
      .map_err(|e| format!("invalid '{id}' field: {e}")),
  }
}

fn embedded_locator(fields: &Map<String, Value>, id: &str) -> Option<ResourceLocator> {
  typed::<SelfLink>(fields, id).ok().flatten().and_then(|link| link.locator)
}

impl TryFrom<RawIssue> for Issue {
  type Error = String;

  fn try_from(raw: RawIssue) -> Result<Self, Self::Error> {
    let RawIssue {
      id,
      key,
      locator,
      names,
      fields,
    } = raw;

    let locators = IssueLocators {
      watchers: embedded_locator(&fields, "watches").unwrap_or_else(|| locator.child("watchers")),
      votes: embedded_locator(&fields, "votes").unwrap_or_else(|| locator.child("votes")),
      comments: locator.child("comment"),
      worklog: locator.child("worklog"),
      transitions: locator.child("transitions"),
      attachments: locator.child("attachments"),
      edit_metadata: locator.child("editmeta"),
      assignee: locator.child("assignee"),
      this: locator,
    };

    let mut standard = BTreeMap::new();
    let mut custom_fields = BTreeMap::new();
    for (field_id, value) in &fields {
      if field_id.starts_with(CUSTOM_FIELD_PREFIX) {
        let name = names.get(field_id).cloned().unwrap_or_else(|| field_id.clone());
        if custom_fields.contains_key(&name) {
          warn!("Issue {} has several custom fields named '{}', keeping the first", key, name);
          continue;
        }
        custom_fields.insert(
          name.clone(),
          CustomField {
            id: field_id.clone(),
            name,
            value: value.clone(),
          },
        );
      } else {
        standard.insert(field_id.clone(), value.clone());
      }
    }

    Ok(Issue {
      summary: typed(&fields, "summary")?,
      description: typed(&fields, "description")?,
      status: typed(&fields, "status")?,
      issue_type: typed(&fields, "issuetype")?,
      project: typed(&fields, "project")?,
      priority: typed(&fields, "priority")?,
      assignee: typed(&fields, "assignee")?,
      reporter: typed(&fields, "reporter")?,
      labels: typed(&fields, "labels")?.unwrap_or_default(),
      subtasks: typed(&fields, "subtasks")?.unwrap_or_default(),
      issue_links: typed(&fields, "issuelinks")?.unwrap_or_default(),
      votes: typed(&fields, "votes")?,
      watches: typed(&fields, "watches")?,
      fields: standard,
      custom_fields,
      locators,
      id,
      key,
    })
  }
}
