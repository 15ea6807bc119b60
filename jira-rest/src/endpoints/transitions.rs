//! # Issue Lifecycle
//!
//! Workflow transitions are discovered from the server on every call; no
//! status names or workflow layouts are assumed.

use tracing::{debug, info, instrument};

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::transition::Transitions;
use crate::models::{Issue, IssueTarget, Transition, TransitionInput};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> JiraClient<T> {
  /// Get the transitions available to the caller from the issue's current
  /// status, including the fields each transition screen asks for.
  #[instrument(skip(self, target), level = "debug")]
  pub async fn get_transitions<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<Vec<Transition>> {
    let locator = target.into().resolve(Issue::transitions_locator);

    let request = ApiRequest::get(locator.url().clone()).query("expand", "transitions.fields");
    let transitions: Transitions = self.send_json(request, &format!("transitions at {locator}")).await?;
    debug!("{} transitions available at {}", transitions.transitions.len(), locator);

    Ok(transitions.transitions)
  }

  /// Move an issue along one of its available transitions.
  ///
  /// The input must name a transition; ids not offered by
  /// [`get_transitions`](Self::get_transitions) are rejected by the server.
  #[instrument(skip(self, target), level = "debug")]
  pub async fn transition<'a>(&self, target: impl Into<IssueTarget<'a>>, input: &TransitionInput) -> Result<()> {
    if input.id.trim().is_empty() {
      return Err(JiraError::invalid_field("transition", "Transition id is required"));
    }

    let locator = target.into().resolve(Issue::transitions_locator);
    let request = ApiRequest::post(locator.url().clone()).json(input.to_payload());
    self
      .send(request, &format!("transition {} at {locator}", input.id))
      .await?;
    info!("Applied transition {} at {}", input.id, locator);

    Ok(())
  }
}
