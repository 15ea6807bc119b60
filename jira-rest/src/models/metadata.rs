//! Field metadata for issue creation and editing.
//!
//! Jira describes fields as a map keyed by field id; this module flattens
//! those maps into lists of [`FieldInfo`] carrying their own id.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::issue::CUSTOM_FIELD_PREFIX;

/// Declared value type of a field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
  #[serde(rename = "type")]
  pub kind: String,
  pub items: Option<String>,
  pub system: Option<String>,
  pub custom: Option<String>,
  pub custom_id: Option<u64>,
}

/// Schema types whose values are JSON objects (`{"name": ..}`, `{"id": ..}`)
const OBJECT_KINDS: &[&str] = &[
  "user",
  "group",
  "priority",
  "option",
  "option-with-child",
  "issuetype",
  "project",
  "resolution",
  "version",
  "component",
  "securitylevel",
  "status",
  "issuelink",
  "timetracking",
  "watches",
  "votes",
];

fn matches_kind(kind: &str, value: &Value) -> bool {
  match kind {
    "string" | "date" | "datetime" => value.is_string(),
    "number" => value.is_number(),
    "any" => true,
    kind if OBJECT_KINDS.contains(&kind) => value.is_object(),
    // Unknown plugin types are left to the server.
    _ => true,
  }
}

impl FieldSchema {
  /// Whether `value` has the JSON shape this schema declares.
  ///
  /// `null` always matches; whether a field may be cleared is decided by
  /// [`FieldInfo::required`].
  pub fn accepts(&self, value: &Value) -> bool {
    if value.is_null() {
      return true;
    }

    if self.kind == "array" {
      let item_kind = self.items.as_deref().unwrap_or("any");
      return value
        .as_array()
        .is_some_and(|items| items.iter().all(|item| matches_kind(item_kind, item)));
    }

    matches_kind(&self.kind, value)
  }

  /// Human-readable description of the expected value
  pub fn expected(&self) -> String {
    match (self.kind.as_str(), self.items.as_deref()) {
      ("array", Some(items)) => format!("an array of {items}"),
      ("array", None) => "an array".to_string(),
      (kind, _) if OBJECT_KINDS.contains(&kind) => format!("a {kind} object"),
      (kind, _) => format!("a {kind}"),
    }
  }
}

/// Description of one field for a given project, issue type or issue
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
  #[serde(default, alias = "fieldId")]
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub required: bool,
  pub schema: Option<FieldSchema>,
  #[serde(default)]
  pub allowed_values: Vec<Value>,
  #[serde(default)]
  pub operations: Vec<String>,
  #[serde(default)]
  pub has_default_value: bool,
}

impl FieldInfo {
  pub fn is_custom(&self) -> bool {
    self.id.starts_with(CUSTOM_FIELD_PREFIX)
  }

  pub fn accepts(&self, value: &Value) -> bool {
    self.schema.as_ref().is_none_or(|schema| schema.accepts(value))
  }
}

pub(crate) fn de_field_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<FieldInfo>, D::Error> {
  let map = BTreeMap::<String, FieldInfo>::deserialize(deserializer)?;
  Ok(
    map
      .into_iter()
      .map(|(id, mut field)| {
        field.id = id;
        field
      })
      .collect(),
  )
}

/// Issue type entry of the create metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CimIssueType {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub subtask: bool,
  pub description: Option<String>,
  #[serde(default, deserialize_with = "de_field_map")]
  pub fields: Vec<FieldInfo>,
}

impl CimIssueType {
  pub fn field(&self, id: &str) -> Option<&FieldInfo> {
    self.fields.iter().find(|field| field.id == id)
  }

  pub fn required_fields(&self) -> impl Iterator<Item = &FieldInfo> {
    self.fields.iter().filter(|field| field.required)
  }
}

/// Project entry of the create metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CimProject {
  pub id: String,
  pub key: String,
  pub name: String,
  #[serde(default, rename = "issuetypes")]
  pub issue_types: Vec<CimIssueType>,
}

impl CimProject {
  pub fn issue_type(&self, name: &str) -> Option<&CimIssueType> {
    self.issue_types.iter().find(|issue_type| issue_type.name == name)
  }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateMetadata {
  #[serde(default)]
  pub projects: Vec<CimProject>,
}

/// Fields editable on one issue by the current user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditMetadata {
  #[serde(default, deserialize_with = "de_field_map")]
  pub fields: Vec<FieldInfo>,
}

impl EditMetadata {
  pub fn field(&self, id: &str) -> Option<&FieldInfo> {
    self.fields.iter().find(|field| field.id == id)
  }

  /// Look up a custom field by its display name
  pub fn custom_field_named(&self, name: &str) -> Option<&FieldInfo> {
    self.fields.iter().find(|field| field.is_custom() && field.name == name)
  }
}

/// Filter for the create metadata request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetCreateIssueMetadataOptions {
  pub project_ids: Vec<String>,
  pub project_keys: Vec<String>,
  pub issue_type_ids: Vec<String>,
  pub issue_type_names: Vec<String>,
  /// Include per-field metadata (`projects.issuetypes.fields`)
  pub expand_fields: bool,
}

impl GetCreateIssueMetadataOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_project_key(mut self, key: &str) -> Self {
    self.project_keys.push(key.to_string());
    self
  }

  pub fn with_project_id(mut self, id: &str) -> Self {
    self.project_ids.push(id.to_string());
    self
  }

  pub fn with_issue_type_name(mut self, name: &str) -> Self {
    self.issue_type_names.push(name.to_string());
    self
  }

  pub fn with_issue_type_id(mut self, id: &str) -> Self {
    self.issue_type_ids.push(id.to_string());
    self
  }

  pub const fn with_fields(mut self) -> Self {
    self.expand_fields = true;
    self
  }

  pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let lists = [
      ("projectIds", &self.project_ids),
      ("projectKeys", &self.project_keys),
      ("issuetypeIds", &self.issue_type_ids),
      ("issuetypeNames", &self.issue_type_names),
    ];

    let mut pairs: Vec<(&'static str, String)> = lists
      .into_iter()
      .filter(|(_, values)| !values.is_empty())
      .map(|(key, values)| (key, values.join(",")))
      .collect();

    if self.expand_fields {
      pairs.push(("expand", "projects.issuetypes.fields".to_string()));
    }
    pairs
  }
}
