//! Opaque references to remote resources.
//!
//! A [`ResourceLocator`] can only be obtained from a representation the
//! server returned, typically its `self` field. Callers can compare, hash and
//! print locators but cannot build one, so subordinate resources are always
//! reached through links the server handed out.

use std::fmt;

use serde::{Deserialize, Deserializer, de};
use url::Url;

use crate::models::Issue;

/// Capability reference to a remote resource.
///
/// Always a hierarchical URL, so sub-resources can be derived from it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator(Url);

impl ResourceLocator {
  /// Accept a link handed out by the server.
  pub(crate) fn parse(raw: &str) -> Result<Self, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid resource locator '{raw}': {e}"))?;
    if url.cannot_be_a_base() {
      return Err(format!("resource locator '{raw}' has no path to extend"));
    }
    Ok(Self(url))
  }

  pub(crate) const fn url(&self) -> &Url {
    &self.0
  }

  /// Locator of a sub-resource directly below this one.
  pub(crate) fn child(&self, segment: &str) -> Self {
    let mut url = self.0.clone();
    url.set_query(None);
    url.set_fragment(None);
    // Infallible: `parse` only admits base URLs
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push(segment);
    }
    Self(url)
  }
}

impl fmt::Debug for ResourceLocator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("ResourceLocator").field(&self.0.as_str()).finish()
  }
}

impl fmt::Display for ResourceLocator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.0.as_str())
  }
}

/// Deserialize a `self` link. Used through `deserialize_with` so that only
/// server representations can produce locators.
pub(crate) fn de_locator<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ResourceLocator, D::Error> {
  let raw = String::deserialize(deserializer)?;
  ResourceLocator::parse(&raw).map_err(de::Error::custom)
}

/// Deserialize an optional `self` link.
pub(crate) fn de_opt_locator<'de, D: Deserializer<'de>>(
  deserializer: D,
) -> Result<Option<ResourceLocator>, D::Error> {
  Option::<String>::deserialize(deserializer)?
    .map(|raw| ResourceLocator::parse(&raw).map_err(de::Error::custom))
    .transpose()
}

/// Either a locator already known from an earlier fetch, or the issue that
/// embeds it.
///
/// Operations accepting an `IssueTarget` resolve the issue form to the
/// relevant locator once and then follow the same path for both forms.
#[derive(Debug, Clone, Copy)]
pub enum IssueTarget<'a> {
  Locator(&'a ResourceLocator),
  Issue(&'a Issue),
}

impl<'a> IssueTarget<'a> {
  /// Pick the locator to use, extracting it from the issue if needed.
  pub(crate) fn resolve(self, pick: fn(&'a Issue) -> &'a ResourceLocator) -> &'a ResourceLocator {
    match self {
      IssueTarget::Locator(locator) => locator,
      IssueTarget::Issue(issue) => pick(issue),
    }
  }
}

impl<'a> From<&'a ResourceLocator> for IssueTarget<'a> {
  fn from(locator: &'a ResourceLocator) -> Self {
    IssueTarget::Locator(locator)
  }
}

impl<'a> From<&'a Issue> for IssueTarget<'a> {
  fn from(issue: &'a Issue) -> Self {
    IssueTarget::Issue(issue)
  }
}
