//! Write-side payloads: everything the caller sends rather than receives.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::consts::{DEFAULT_MAX_RESULTS, MAX_RESULTS_CEILING};
use crate::models::Visibility;

/// Field values to set on creation, update or transition.
///
/// A field absent from the input is left alone by the server; a field
/// present with a `null` value is explicitly cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueInput {
  fields: BTreeMap<String, Value>,
}

impl IssueInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start an input for a new issue in the given project.
  pub fn for_create(project_key: &str, issue_type_name: &str) -> Self {
    Self::new()
      .with_project_key(project_key)
      .with_issue_type_name(issue_type_name)
  }

  pub fn with_field(mut self, id: &str, value: impl Into<Value>) -> Self {
    self.fields.insert(id.to_string(), value.into());
    self
  }

  /// Explicitly clear a field.
  pub fn with_cleared(mut self, id: &str) -> Self {
    self.fields.insert(id.to_string(), Value::Null);
    self
  }

  pub fn with_summary(self, summary: &str) -> Self {
    self.with_field("summary", summary)
  }

  pub fn with_description(self, description: &str) -> Self {
    self.with_field("description", description)
  }

  pub fn with_project_key(self, key: &str) -> Self {
    self.with_field("project", json!({ "key": key }))
  }

  pub fn with_issue_type_id(self, id: &str) -> Self {
    self.with_field("issuetype", json!({ "id": id }))
  }

  pub fn with_issue_type_name(self, name: &str) -> Self {
    self.with_field("issuetype", json!({ "name": name }))
  }

  pub fn with_assignee_name(self, name: &str) -> Self {
    self.with_field("assignee", json!({ "name": name }))
  }

  pub fn with_reporter_name(self, name: &str) -> Self {
    self.with_field("reporter", json!({ "name": name }))
  }

  pub fn with_priority_name(self, name: &str) -> Self {
    self.with_field("priority", json!({ "name": name }))
  }

  /// Parent issue, for sub-tasks
  pub fn with_parent_key(self, key: &str) -> Self {
    self.with_field("parent", json!({ "key": key }))
  }

  pub fn with_labels<I, S>(self, labels: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    self.with_field("labels", labels)
  }

  pub fn with_due_date(self, date: NaiveDate) -> Self {
    self.with_field("duedate", date.format("%Y-%m-%d").to_string())
  }

  pub fn field(&self, id: &str) -> Option<&Value> {
    self.fields.get(id)
  }

  pub fn is_cleared(&self, id: &str) -> bool {
    self.fields.get(id).is_some_and(Value::is_null)
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn field_ids(&self) -> impl Iterator<Item = &str> {
    self.fields.keys().map(String::as_str)
  }

  pub(crate) fn to_payload(&self) -> Value {
    json!({ "fields": self.fields })
  }
}

/// Body of a new comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentInput {
  pub body: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub visibility: Option<Visibility>,
}

impl CommentInput {
  pub fn new(body: &str) -> Self {
    Self {
      body: body.to_string(),
      visibility: None,
    }
  }

  pub fn with_visibility(mut self, visibility: Visibility) -> Self {
    self.visibility = Some(visibility);
    self
  }
}

/// The lifecycle edge to take, plus the values its screen asks for
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionInput {
  pub id: String,
  pub fields: BTreeMap<String, Value>,
  pub comment: Option<CommentInput>,
}

impl TransitionInput {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      fields: BTreeMap::new(),
      comment: None,
    }
  }

  pub fn with_field(mut self, id: &str, value: impl Into<Value>) -> Self {
    self.fields.insert(id.to_string(), value.into());
    self
  }

  pub fn with_comment(mut self, comment: CommentInput) -> Self {
    self.comment = Some(comment);
    self
  }

  pub(crate) fn to_payload(&self) -> Value {
    let mut payload = Map::new();
    payload.insert("transition".to_string(), json!({ "id": self.id.trim() }));
    if !self.fields.is_empty() {
      payload.insert("fields".to_string(), json!(self.fields));
    }
    if let Some(comment) = &self.comment {
      payload.insert("update".to_string(), json!({ "comment": [{ "add": comment }] }));
    }
    Value::Object(payload)
  }
}

/// How the remaining estimate changes when work is logged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AdjustEstimate {
  #[default]
  Auto,
  Leave,
  /// Set the remaining estimate to this value (e.g. "2d")
  New(String),
  /// Reduce the remaining estimate by this value
  Manual(String),
}

impl AdjustEstimate {
  pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
    match self {
      AdjustEstimate::Auto => vec![("adjustEstimate", "auto".to_string())],
      AdjustEstimate::Leave => vec![("adjustEstimate", "leave".to_string())],
      AdjustEstimate::New(estimate) => vec![
        ("adjustEstimate", "new".to_string()),
        ("newEstimate", estimate.clone()),
      ],
      AdjustEstimate::Manual(reduce_by) => vec![
        ("adjustEstimate", "manual".to_string()),
        ("reduceBy", reduce_by.clone()),
      ],
    }
  }
}

/// Time logged against an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogInput {
  pub started: DateTime<FixedOffset>,
  pub time_spent_seconds: u64,
  pub comment: Option<String>,
  pub visibility: Option<Visibility>,
  pub adjust_estimate: AdjustEstimate,
}

impl WorklogInput {
  pub fn new(started: DateTime<FixedOffset>, time_spent_seconds: u64) -> Self {
    Self {
      started,
      time_spent_seconds,
      comment: None,
      visibility: None,
      adjust_estimate: AdjustEstimate::default(),
    }
  }

  pub fn with_comment(mut self, comment: &str) -> Self {
    self.comment = Some(comment.to_string());
    self
  }

  pub fn with_visibility(mut self, visibility: Visibility) -> Self {
    self.visibility = Some(visibility);
    self
  }

  pub fn with_adjust_estimate(mut self, adjust_estimate: AdjustEstimate) -> Self {
    self.adjust_estimate = adjust_estimate;
    self
  }

  pub(crate) fn to_payload(&self) -> Value {
    let mut payload = Map::new();
    payload.insert(
      "started".to_string(),
      json!(self.started.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()),
    );
    payload.insert("timeSpentSeconds".to_string(), json!(self.time_spent_seconds));
    if let Some(comment) = &self.comment {
      payload.insert("comment".to_string(), json!(comment));
    }
    if let Some(visibility) = &self.visibility {
      payload.insert("visibility".to_string(), json!(visibility));
    }
    Value::Object(payload)
  }
}

/// A directed link between two issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIssuesInput {
  /// Link type name, e.g. "Blocks" or "Relates"
  pub link_type: String,
  pub inward_key: String,
  pub outward_key: String,
  pub comment: Option<CommentInput>,
}

impl LinkIssuesInput {
  pub fn new(link_type: &str, inward_key: &str, outward_key: &str) -> Self {
    Self {
      link_type: link_type.to_string(),
      inward_key: inward_key.to_string(),
      outward_key: outward_key.to_string(),
      comment: None,
    }
  }

  pub fn with_comment(mut self, comment: CommentInput) -> Self {
    self.comment = Some(comment);
    self
  }

  pub(crate) fn to_payload(&self) -> Value {
    let mut payload = json!({
      "type": { "name": self.link_type },
      "inwardIssue": { "key": self.inward_key },
      "outwardIssue": { "key": self.outward_key },
    });
    if let Some(comment) = &self.comment {
      payload["comment"] = json!(comment);
    }
    payload
  }
}

/// Who an issue gets assigned to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
  /// A user by username (Jira Server / Data Center)
  Name(String),
  /// A user by account id (Jira Cloud)
  AccountId(String),
  Unassigned,
  /// The project's default assignee
  Automatic,
}

impl Assignee {
  pub(crate) fn to_payload(&self) -> Value {
    match self {
      Assignee::Name(name) => json!({ "name": name }),
      Assignee::AccountId(account_id) => json!({ "accountId": account_id }),
      Assignee::Unassigned => json!({ "name": null }),
      Assignee::Automatic => json!({ "name": "-1" }),
    }
  }
}

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub start_at: u32,
  pub max_results: u32,
}

impl Default for Page {
  fn default() -> Self {
    Self {
      start_at: 0,
      max_results: DEFAULT_MAX_RESULTS,
    }
  }
}

impl Page {
  pub const fn new(start_at: u32, max_results: u32) -> Self {
    Self { start_at, max_results }
  }

  /// Page size after applying the server ceiling.
  pub fn effective_max_results(&self) -> u32 {
    self.max_results.min(MAX_RESULTS_CEILING)
  }
}

/// System fields addressable by the field edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardField {
  Summary,
  Description,
  Assignee,
  Reporter,
  Priority,
  Labels,
  DueDate,
  Environment,
  Components,
  FixVersions,
  AffectsVersions,
}

impl StandardField {
  pub const fn id(self) -> &'static str {
    match self {
      StandardField::Summary => "summary",
      StandardField::Description => "description",
      StandardField::Assignee => "assignee",
      StandardField::Reporter => "reporter",
      StandardField::Priority => "priority",
      StandardField::Labels => "labels",
      StandardField::DueDate => "duedate",
      StandardField::Environment => "environment",
      StandardField::Components => "components",
      StandardField::FixVersions => "fixVersions",
      StandardField::AffectsVersions => "versions",
    }
  }
}

/// Which field an edit targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
  Standard(StandardField),
  /// Custom field by display name, resolved against the issue's edit metadata
  Custom(String),
}

impl FieldKey {
  pub fn custom(name: &str) -> Self {
    FieldKey::Custom(name.to_string())
  }
}

impl From<StandardField> for FieldKey {
  fn from(field: StandardField) -> Self {
    FieldKey::Standard(field)
  }
}

impl fmt::Display for FieldKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldKey::Standard(field) => f.write_str(field.id()),
      FieldKey::Custom(name) => f.write_str(name),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn test_issue_input_distinguishes_omitted_and_cleared() {
    let input = IssueInput::for_create("TEST", "Bug")
      .with_summary("Broken build")
      .with_cleared("assignee");

    assert!(input.is_cleared("assignee"));
    assert!(!input.is_cleared("summary"));
    assert!(input.field("description").is_none());

    assert_eq!(
      input.to_payload(),
      json!({
        "fields": {
          "assignee": null,
          "issuetype": { "name": "Bug" },
          "project": { "key": "TEST" },
          "summary": "Broken build"
        }
      })
    );
  }

  #[test]
  fn test_issue_input_labels_and_due_date() {
    let input = IssueInput::new()
      .with_labels(["a", "b"])
      .with_due_date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());

    assert_eq!(input.field("labels"), Some(&json!(["a", "b"])));
    assert_eq!(input.field("duedate"), Some(&json!("2024-05-17")));
  }

  #[test]
  fn test_transition_payload() {
    let input = TransitionInput::new("31")
      .with_field("resolution", json!({ "name": "Fixed" }))
      .with_comment(CommentInput::new("Done and dusted"));

    assert_eq!(
      input.to_payload(),
      json!({
        "transition": { "id": "31" },
        "fields": { "resolution": { "name": "Fixed" } },
        "update": { "comment": [{ "add": { "body": "Done and dusted" } }] }
      })
    );
  }

  #[test]
  fn test_transition_payload_minimal() {
    assert_eq!(
      TransitionInput::new("21").to_payload(),
      json!({ "transition": { "id": "21" } })
    );
  }

  #[test]
  fn test_worklog_payload_and_estimate() {
    let started = FixedOffset::east_opt(0)
      .unwrap()
      .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
      .unwrap();
    let input = WorklogInput::new(started, 5400)
      .with_comment("Pairing")
      .with_adjust_estimate(AdjustEstimate::New("2d".to_string()));

    assert_eq!(
      input.to_payload(),
      json!({
        "started": "2024-03-01T09:00:00.000+0000",
        "timeSpentSeconds": 5400,
        "comment": "Pairing"
      })
    );
    assert_eq!(
      input.adjust_estimate.query_pairs(),
      vec![("adjustEstimate", "new".to_string()), ("newEstimate", "2d".to_string())]
    );
  }

  #[test]
  fn test_assignee_payloads() {
    assert_eq!(Assignee::Name("alice".into()).to_payload(), json!({ "name": "alice" }));
    assert_eq!(Assignee::AccountId("5b10a".into()).to_payload(), json!({ "accountId": "5b10a" }));
    assert_eq!(Assignee::Unassigned.to_payload(), json!({ "name": null }));
    assert_eq!(Assignee::Automatic.to_payload(), json!({ "name": "-1" }));
  }

  #[test]
  fn test_link_payload() {
    let input = LinkIssuesInput::new("Blocks", "TEST-1", "TEST-2");
    assert_eq!(
      input.to_payload(),
      json!({
        "type": { "name": "Blocks" },
        "inwardIssue": { "key": "TEST-1" },
        "outwardIssue": { "key": "TEST-2" }
      })
    );
  }

  #[test]
  fn test_page_ceiling() {
    assert_eq!(Page::new(0, 2000).effective_max_results(), MAX_RESULTS_CEILING);
    assert_eq!(Page::new(0, 20).effective_max_results(), 20);
    assert_eq!(Page::default().max_results, DEFAULT_MAX_RESULTS);
  }

  #[test]
  fn test_field_key_display() {
    assert_eq!(FieldKey::from(StandardField::FixVersions).to_string(), "fixVersions");
    assert_eq!(FieldKey::custom("Story Points").to_string(), "Story Points");
  }
}
