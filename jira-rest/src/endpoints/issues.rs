//! # Jira Issue Endpoints
//!
//! Fetching, creating, updating, deleting and assigning single issues.

use tracing::{debug, info, instrument};

use crate::client::JiraClient;
use crate::endpoints::require_key;
use crate::error::{JiraError, Result};
use crate::models::{Assignee, BasicIssue, Issue, IssueInput, IssueTarget};
use crate::transport::{ApiRequest, Transport};

/// Expansion always requested so custom fields can be keyed by name
const NAMES_EXPANSION: &str = "names";

impl<T: Transport> JiraClient<T> {
  /// Get a Jira issue by key
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str) -> Result<Issue> {
    self.get_issue_with(issue_key, &[]).await
  }

  /// Get a Jira issue by key with extra expansions (e.g. `renderedFields`,
  /// `changelog`).
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue_with(&self, issue_key: &str, expand: &[&str]) -> Result<Issue> {
    let issue_key = require_key(issue_key)?;

    let mut expansions = vec![NAMES_EXPANSION];
    expansions.extend(expand.iter().copied().filter(|e| *e != NAMES_EXPANSION));

    let request = ApiRequest::get(self.api_url(&["issue", issue_key])?).query("expand", expansions.join(","));
    let issue: Issue = self.send_json(request, &format!("issue {issue_key}")).await?;
    debug!("Fetched issue {} ({} custom fields)", issue.key, issue.custom_fields.len());

    Ok(issue)
  }

  /// Create a single issue.
  ///
  /// Any problem with the input fails the whole call; nothing is created.
  #[instrument(skip(self), level = "debug")]
  pub async fn create_issue(&self, input: &IssueInput) -> Result<BasicIssue> {
    if input.is_empty() {
      return Err(JiraError::invalid("Issue input has no fields set"));
    }

    let request = ApiRequest::post(self.api_url(&["issue"])?).json(input.to_payload());
    let created: BasicIssue = self.send_json(request, "create issue").await?;
    info!("Created issue {}", created.key);

    Ok(created)
  }

  /// Set several fields of an existing issue in one update
  #[instrument(skip(self, target), level = "debug")]
  pub async fn update_issue<'a>(&self, target: impl Into<IssueTarget<'a>>, input: &IssueInput) -> Result<()> {
    if input.is_empty() {
      return Err(JiraError::invalid("Issue input has no fields set"));
    }

    let locator = target.into().resolve(Issue::self_locator);
    let request = ApiRequest::put(locator.url().clone()).json(input.to_payload());
    self.send(request, &format!("update {locator}")).await?;
    info!("Updated {}", locator);

    Ok(())
  }

  /// Delete an issue.
  ///
  /// Fails with a conflict when the issue has sub-tasks and
  /// `delete_subtasks` is false.
  #[instrument(skip(self), level = "debug")]
  pub async fn delete_issue(&self, issue_key: &str, delete_subtasks: bool) -> Result<()> {
    let issue_key = require_key(issue_key)?;

    let request = ApiRequest::delete(self.api_url(&["issue", issue_key])?).query("deleteSubtasks", delete_subtasks);
    self
      .send(request, &format!("delete issue {issue_key}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Deleted issue {}", issue_key);

    Ok(())
  }

  /// Assign an issue, unassign it, or hand it to the project default.
  ///
  /// An unknown user is rejected by the server with a validation error (or
  /// not found, depending on the deployment).
  #[instrument(skip(self, target), level = "debug")]
  pub async fn assign_to<'a>(&self, target: impl Into<IssueTarget<'a>>, assignee: &Assignee) -> Result<()> {
    let locator = target.into().resolve(Issue::assignee_locator);
    let request = ApiRequest::put(locator.url().clone()).json(assignee.to_payload());
    self.send(request, &format!("assign {locator}")).await?;
    info!("Assigned {} to {:?}", locator, assignee);

    Ok(())
  }
}
