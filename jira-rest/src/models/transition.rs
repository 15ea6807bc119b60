use serde::Deserialize;

use crate::models::metadata::de_field_map;
use crate::models::{FieldInfo, Status};

/// Represents a Jira transition available from an issue's current status
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transition {
  pub id: String,
  pub name: String,
  pub to: Option<Status>,
  /// Fields shown on the transition screen, with their required-ness and types
  #[serde(default, deserialize_with = "de_field_map")]
  pub fields: Vec<FieldInfo>,
}

impl Transition {
  pub fn required_fields(&self) -> impl Iterator<Item = &FieldInfo> {
    self.fields.iter().filter(|field| field.required)
  }

  pub fn field(&self, id: &str) -> Option<&FieldInfo> {
    self.fields.iter().find(|field| field.id == id)
  }
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub(crate) struct Transitions {
  #[serde(default)]
  pub transitions: Vec<Transition>,
}
