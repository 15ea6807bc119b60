//! # Watchers and Votes
//!
//! None of these mutations are idempotent: voting twice, unvoting without a
//! vote, watching twice or removing an absent watcher all fail with
//! [`JiraError::Conflict`]. Each mutation reads the current list first and
//! then applies the change, so the contract holds whether or not the server
//! rejects the repeat itself.

use serde_json::json;
use tracing::{debug, info, instrument};

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::{Issue, IssueTarget, ResourceLocator, User, Votes, Watchers};
use crate::transport::{ApiRequest, Transport};

/// Query parameter naming a watcher to remove
fn watcher_query(user: &User, id: &str) -> (&'static str, String) {
  if user.account_id.as_deref() == Some(id) && user.name.as_deref() != Some(id) {
    ("accountId", id.to_string())
  } else {
    ("username", id.to_string())
  }
}

impl<T: Transport> JiraClient<T> {
  /// Get the watchers of an issue
  #[instrument(skip(self, target), level = "debug")]
  pub async fn get_watchers<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<Watchers> {
    let locator = target.into().resolve(Issue::watchers_locator);
    self.fetch_watchers(locator).await
  }

  /// Get the votes of an issue
  #[instrument(skip(self, target), level = "debug")]
  pub async fn get_votes<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<Votes> {
    let locator = target.into().resolve(Issue::votes_locator);
    self.fetch_votes(locator).await
  }

  /// Vote for an issue as the current user
  #[instrument(skip(self, target), level = "debug")]
  pub async fn vote<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<()> {
    let locator = target.into().resolve(Issue::votes_locator);

    if self.fetch_votes(locator).await?.has_voted {
      return Err(JiraError::conflict("You have already voted for this issue"));
    }

    self
      .send(ApiRequest::post(locator.url().clone()), &format!("vote at {locator}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Voted at {}", locator);

    Ok(())
  }

  /// Withdraw the current user's vote
  #[instrument(skip(self, target), level = "debug")]
  pub async fn unvote<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<()> {
    let locator = target.into().resolve(Issue::votes_locator);

    if !self.fetch_votes(locator).await?.has_voted {
      return Err(JiraError::conflict("You have not voted for this issue"));
    }

    self
      .send(ApiRequest::delete(locator.url().clone()), &format!("unvote at {locator}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Removed vote at {}", locator);

    Ok(())
  }

  /// Start watching an issue as the current user
  #[instrument(skip(self, target), level = "debug")]
  pub async fn watch<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<()> {
    let locator = target.into().resolve(Issue::watchers_locator);

    if self.fetch_watchers(locator).await?.is_watching {
      return Err(JiraError::conflict("You are already watching this issue"));
    }

    self
      .send(ApiRequest::post(locator.url().clone()), &format!("watch at {locator}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Watching {}", locator);

    Ok(())
  }

  /// Stop watching an issue as the current user
  #[instrument(skip(self, target), level = "debug")]
  pub async fn unwatch<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<()> {
    let locator = target.into().resolve(Issue::watchers_locator);

    if !self.fetch_watchers(locator).await?.is_watching {
      return Err(JiraError::conflict("You are not watching this issue"));
    }

    let me = self.get_current_user().await?;
    let (param, value) = match (&me.name, &me.account_id) {
      (Some(name), _) => ("username", name.clone()),
      (None, Some(account_id)) => ("accountId", account_id.clone()),
      (None, None) => return Err(JiraError::transport("Current user has neither a username nor an account id")),
    };

    let request = ApiRequest::delete(locator.url().clone()).query(param, value);
    self
      .send(request, &format!("unwatch at {locator}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Stopped watching {}", locator);

    Ok(())
  }

  /// Add another user to the watchers
  #[instrument(skip(self, target), level = "debug")]
  pub async fn add_watcher<'a>(&self, target: impl Into<IssueTarget<'a>>, username: &str) -> Result<()> {
    let locator = target.into().resolve(Issue::watchers_locator);

    let watchers = self.fetch_watchers(locator).await?;
    if watchers.watchers.iter().any(|watcher| watcher.identifies(username)) {
      return Err(JiraError::conflict(format!("'{username}' is already watching this issue")));
    }

    let request = ApiRequest::post(locator.url().clone()).json(json!(username));
    self
      .send(request, &format!("add watcher '{username}' at {locator}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Added watcher '{}' at {}", username, locator);

    Ok(())
  }

  /// Remove another user from the watchers
  #[instrument(skip(self, target), level = "debug")]
  pub async fn remove_watcher<'a>(&self, target: impl Into<IssueTarget<'a>>, username: &str) -> Result<()> {
    let locator = target.into().resolve(Issue::watchers_locator);

    let watchers = self.fetch_watchers(locator).await?;
    let Some(watcher) = watchers.watchers.iter().find(|watcher| watcher.identifies(username)) else {
      return Err(JiraError::conflict(format!("'{username}' is not watching this issue")));
    };

    let (param, value) = watcher_query(watcher, username);
    let request = ApiRequest::delete(locator.url().clone()).query(param, value);
    self
      .send(request, &format!("remove watcher '{username}' at {locator}"))
      .await
      .map_err(JiraError::into_state_conflict)?;
    info!("Removed watcher '{}' at {}", username, locator);

    Ok(())
  }

  async fn fetch_watchers(&self, locator: &ResourceLocator) -> Result<Watchers> {
    let request = ApiRequest::get(locator.url().clone());
    let watchers: Watchers = self.send_json(request, &format!("watchers at {locator}")).await?;
    debug!("{} watchers at {}", watchers.watch_count, locator);
    Ok(watchers)
  }

  async fn fetch_votes(&self, locator: &ResourceLocator) -> Result<Votes> {
    let request = ApiRequest::get(locator.url().clone());
    let votes: Votes = self.send_json(request, &format!("votes at {locator}")).await?;
    debug!("{} votes at {}", votes.votes, locator);
    Ok(votes)
  }
}

#[cfg(test)]
mod tests {
  use jira_rest_test_utils::fixtures;
  use serde_json::json;
  use wiremock::matchers::{body_json, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::endpoints::test_support::{issue, mock_client};
  use crate::error::ErrorKind;

  const VOTES_PATH: &str = "/rest/api/2/issue/TEST-1/votes";
  const WATCHERS_PATH: &str = "/rest/api/2/issue/TEST-1/watchers";

  async fn mount_votes(mock_server: &MockServer, has_voted: bool) {
    Mock::given(method("GET"))
      .and(path(VOTES_PATH))
      .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::votes_json(has_voted)))
      .mount(mock_server)
      .await;
  }

  async fn mount_watchers(mock_server: &MockServer, is_watching: bool, watchers: &[&str]) {
    Mock::given(method("GET"))
      .and(path(WATCHERS_PATH))
      .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::watchers_json(is_watching, watchers)))
      .mount(mock_server)
      .await;
  }

  #[tokio::test]
  async fn test_get_votes_and_watchers_follow_embedded_links() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_votes(&mock_server, true).await;
    mount_watchers(&mock_server, false, &["bob"]).await;

    let votes = client.get_votes(&issue).await?;
    assert!(votes.has_voted);
    assert_eq!(votes.votes, 1);

    let watchers = client.get_watchers(issue.watchers_locator()).await?;
    assert!(!watchers.is_watching);
    assert_eq!(watchers.watchers[0].name.as_deref(), Some("bob"));

    Ok(())
  }

  #[tokio::test]
  async fn test_vote() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_votes(&mock_server, false).await;

    Mock::given(method("POST"))
      .and(path(VOTES_PATH))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.vote(&issue).await?;
    Ok(())
  }

  #[tokio::test]
  async fn test_vote_twice_is_conflict() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_votes(&mock_server, true).await;

    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(204))
      .expect(0)
      .mount(&mock_server)
      .await;

    let err = client.vote(&issue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    Ok(())
  }

  #[tokio::test]
  async fn test_server_rejection_is_conflict() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_votes(&mock_server, false).await;

    Mock::given(method("POST"))
      .and(path(VOTES_PATH))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
          "errorMessages": ["You cannot vote for an issue you have reported."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client.vote(&issue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.to_string().contains("reported"));
    Ok(())
  }

  #[tokio::test]
  async fn test_unvote_without_vote_is_conflict() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_votes(&mock_server, false).await;

    let err = client.unvote(&issue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    Ok(())
  }

  #[tokio::test]
  async fn test_unvote() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_votes(&mock_server, true).await;

    Mock::given(method("DELETE"))
      .and(path(VOTES_PATH))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.unvote(issue.votes_locator()).await?;
    Ok(())
  }

  #[tokio::test]
  async fn test_watch_and_unwatch() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_watchers(&mock_server, false, &[]).await;

    Mock::given(method("POST"))
      .and(path(WATCHERS_PATH))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.watch(&issue).await?;

    let err = client.unwatch(&issue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    Ok(())
  }

  #[tokio::test]
  async fn test_unwatch_removes_current_user() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_watchers(&mock_server, true, &["test_user"]).await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/myself"))
      .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::user_json("test_user")))
      .mount(&mock_server)
      .await;

    Mock::given(method("DELETE"))
      .and(path(WATCHERS_PATH))
      .and(query_param("username", "test_user"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.unwatch(&issue).await?;

    let err = client.watch(&issue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    Ok(())
  }

  #[tokio::test]
  async fn test_add_and_remove_watcher() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");
    mount_watchers(&mock_server, false, &["bob"]).await;

    Mock::given(method("POST"))
      .and(path(WATCHERS_PATH))
      .and(body_json(json!("carol")))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    Mock::given(method("DELETE"))
      .and(path(WATCHERS_PATH))
      .and(query_param("username", "bob"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.add_watcher(&issue, "carol").await?;
    client.remove_watcher(&issue, "bob").await?;

    let err = client.add_watcher(&issue, "bob").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let err = client.remove_watcher(&issue, "carol").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    Ok(())
  }

  #[tokio::test]
  async fn test_stale_votes_locator_is_not_found() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");

    Mock::given(method("GET"))
      .and(path(VOTES_PATH))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    let err = client.vote(&issue).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
  }
}
