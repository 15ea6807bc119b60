//! Per-item outcomes of a bulk operation.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{ErrorCollection, JiraError, Result};

/// Ordered outcome of a bulk operation: slot `i` belongs to input item `i`.
#[derive(Debug)]
pub struct BulkOperationResult<T> {
  items: Vec<Result<T>>,
}

impl<T> BulkOperationResult<T> {
  pub(crate) const fn empty() -> Self {
    Self { items: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Result<T>> {
    self.items.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Result<T>> {
    self.items.iter()
  }

  /// Successful items with their input position
  pub fn successes(&self) -> impl Iterator<Item = (usize, &T)> {
    self
      .items
      .iter()
      .enumerate()
      .filter_map(|(index, item)| item.as_ref().ok().map(|value| (index, value)))
  }

  /// Failed items with their input position
  pub fn failures(&self) -> impl Iterator<Item = (usize, &JiraError)> {
    self
      .items
      .iter()
      .enumerate()
      .filter_map(|(index, item)| item.as_ref().err().map(|err| (index, err)))
  }

  pub fn all_succeeded(&self) -> bool {
    self.items.iter().all(Result::is_ok)
  }

  pub fn into_items(self) -> Vec<Result<T>> {
    self.items
  }
}

impl<T> IntoIterator for BulkOperationResult<T> {
  type Item = Result<T>;
  type IntoIter = std::vec::IntoIter<Result<T>>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.into_iter()
  }
}

impl<'a, T> IntoIterator for &'a BulkOperationResult<T> {
  type Item = &'a Result<T>;
  type IntoIter = std::slice::Iter<'a, Result<T>>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}

/// Failure entry of a bulk response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkElementError {
  pub status: Option<u16>,
  #[serde(default)]
  pub element_errors: ErrorCollection,
  pub failed_element_number: usize,
}

/// Body of a bulk creation response, success or partial failure alike
#[derive(Debug, Deserialize)]
#[serde(bound = "T: Deserialize<'de>")]
pub(crate) struct BulkResponse<T> {
  #[serde(default)]
  pub issues: Vec<T>,
  #[serde(default)]
  pub errors: Vec<BulkElementError>,
}

impl<T> BulkResponse<T> {
  /// Place every success and failure in the slot of the input item it
  /// belongs to.
  ///
  /// Failures name their slot; successes carry no index and are assigned to
  /// the remaining slots in order. A response that does not account for
  /// exactly `batch_len` items cannot be trusted and fails as a whole.
  pub(crate) fn reconcile(self, batch_len: usize) -> Result<BulkOperationResult<T>> {
    let BulkResponse { issues, errors } = self;

    if issues.len() + errors.len() != batch_len {
      return Err(JiraError::transport(format!(
        "Bulk response accounts for {} successes and {} failures, but {} items were sent",
        issues.len(),
        errors.len(),
        batch_len
      )));
    }

    let mut failed: BTreeMap<usize, BulkElementError> = BTreeMap::new();
    for error in errors {
      let slot = error.failed_element_number;
      if slot >= batch_len {
        return Err(JiraError::transport(format!(
          "Bulk response reports a failure for item {slot}, but only {batch_len} items were sent"
        )));
      }
      if failed.insert(slot, error).is_some() {
        return Err(JiraError::transport(format!(
          "Bulk response reports item {slot} as failed more than once"
        )));
      }
    }

    let mut successes = issues.into_iter();
    let mut items = Vec::with_capacity(batch_len);
    for slot in 0..batch_len {
      let item = match failed.remove(&slot) {
        Some(error) => {
          let status = error
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_REQUEST);
          Err(JiraError::from_status(
            status,
            error.element_errors,
            &format!("bulk item {slot}"),
          ))
        }
        None => match successes.next() {
          Some(created) => Ok(created),
          None => return Err(JiraError::transport("Bulk response ran out of created issues")),
        },
      };
      items.push(item);
    }

    Ok(BulkOperationResult { items })
  }
}
