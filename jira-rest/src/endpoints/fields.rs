//! # Field Edits
//!
//! Single-field updates checked against the issue's edit metadata, plus the
//! label verbs built on the same update call.

use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::{EditMetadata, FieldInfo, FieldKey, Issue, IssueTarget};
use crate::transport::{ApiRequest, Transport};

/// Label edit verb of the `update` payload
#[derive(Debug, Clone, Copy)]
enum LabelVerb {
  Add,
  Remove,
}

impl LabelVerb {
  const fn as_str(self) -> &'static str {
    match self {
      LabelVerb::Add => "add",
      LabelVerb::Remove => "remove",
    }
  }
}

fn validate_label(label: &str) -> Result<&str> {
  if label.is_empty() {
    return Err(JiraError::invalid_field("labels", "Label cannot be empty"));
  }
  if label.chars().any(char::is_whitespace) {
    return Err(JiraError::invalid_field(
      "labels",
      format!("Label '{label}' cannot contain spaces"),
    ));
  }
  Ok(label)
}

/// Find the metadata entry an edit targets.
fn resolve_field<'m>(metadata: &'m EditMetadata, key: &FieldKey) -> Result<&'m FieldInfo> {
  match key {
    FieldKey::Standard(field) => metadata.field(field.id()).ok_or_else(|| {
      JiraError::invalid_field(field.id(), "Field is not editable on this issue")
    }),
    FieldKey::Custom(name) => metadata
      .custom_field_named(name)
      .ok_or_else(|| JiraError::not_found(format!("No editable custom field named '{name}'"))),
  }
}

/// Check a value against the field's required-ness and declared type.
fn check_value(field: &FieldInfo, value: &Value) -> Result<()> {
  if value.is_null() && field.required {
    return Err(JiraError::invalid_field(
      &field.id,
      format!("{} is required and cannot be cleared", field.name),
    ));
  }

  if !field.accepts(value) {
    let expected = field
      .schema
      .as_ref()
      .map_or_else(|| "a different value".to_string(), |schema| schema.expected());
    return Err(JiraError::invalid_field(
      &field.id,
      format!("{} expects {expected}", field.name),
    ));
  }

  Ok(())
}

impl<T: Transport> JiraClient<T> {
  /// Get the fields the caller may edit on an issue, with their types
  #[instrument(skip(self, target), level = "debug")]
  pub async fn get_edit_issue_metadata<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<EditMetadata> {
    let locator = target.into().resolve(Issue::edit_metadata_locator);

    let request = ApiRequest::get(locator.url().clone());
    let metadata: EditMetadata = self.send_json(request, &format!("edit metadata at {locator}")).await?;
    debug!("{} editable fields at {}", metadata.fields.len(), locator);

    Ok(metadata)
  }

  /// Set one field of an issue.
  ///
  /// The edit metadata is fetched on every call. Custom fields are addressed
  /// by display name; `null` clears the field.
  #[instrument(skip(self, issue, key, value), fields(issue = %issue.key), level = "debug")]
  pub async fn edit_field(&self, issue: &Issue, key: impl Into<FieldKey>, value: Value) -> Result<()> {
    let key = key.into();
    let metadata = self.get_edit_issue_metadata(issue).await?;

    let field = resolve_field(&metadata, &key).inspect_err(|e| warn!("Cannot edit '{}': {}", key, e))?;
    check_value(field, &value)?;

    let mut fields = serde_json::Map::new();
    fields.insert(field.id.clone(), value);
    let request = ApiRequest::put(issue.self_locator().url().clone()).json(json!({ "fields": fields }));
    self.send(request, &format!("edit {} of {}", field.id, issue.key)).await?;
    info!("Updated field {} ({}) of {}", key, field.id, issue.key);

    Ok(())
  }

  /// Add a label. Adding a label the issue already carries is a no-op.
  #[instrument(skip(self, target), level = "debug")]
  pub async fn add_label<'a>(&self, target: impl Into<IssueTarget<'a>>, label: &str) -> Result<()> {
    self.edit_labels(target.into(), LabelVerb::Add, label).await
  }

  /// Remove a label. Removing a label the issue does not carry is a no-op.
  #[instrument(skip(self, target), level = "debug")]
  pub async fn remove_label<'a>(&self, target: impl Into<IssueTarget<'a>>, label: &str) -> Result<()> {
    self.edit_labels(target.into(), LabelVerb::Remove, label).await
  }

  async fn edit_labels(&self, target: IssueTarget<'_>, verb: LabelVerb, label: &str) -> Result<()> {
    let locator = target.resolve(Issue::self_locator);
    let label = match (verb, validate_label(label)) {
      (_, Ok(label)) => label,
      (LabelVerb::Add, Err(e)) => return Err(e),
      // No issue can carry such a label
      (LabelVerb::Remove, Err(_)) => {
        debug!("Label '{}' cannot exist at {}, nothing to remove", label, locator);
        return Ok(());
      }
    };

    let mut operation = serde_json::Map::new();
    operation.insert(verb.as_str().to_string(), json!(label));
    let payload = json!({ "update": { "labels": [operation] } });
    let request = ApiRequest::put(locator.url().clone()).json(payload);
    self
      .send(request, &format!("{} label '{label}' at {locator}", verb.as_str()))
      .await?;
    info!("Label '{}' {:?} at {}", label, verb, locator);

    Ok(())
  }
}
