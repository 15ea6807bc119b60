//! # Comments, Worklogs, Attachments and Links

use tracing::{debug, info, instrument};

use crate::client::JiraClient;
use crate::consts::{ATLASSIAN_TOKEN_HEADER, ATLASSIAN_TOKEN_NO_CHECK};
use crate::endpoints::require_key;
use crate::error::{JiraError, Result};
use crate::models::social::{CommentPage, WorklogPage};
use crate::models::{
  Attachment, Comment, CommentInput, Issue, IssueTarget, LinkIssuesInput, Worklog, WorklogInput,
};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> JiraClient<T> {
  /// Add a comment to an issue
  #[instrument(skip(self, target), level = "debug")]
  pub async fn add_comment<'a>(&self, target: impl Into<IssueTarget<'a>>, comment: &CommentInput) -> Result<Comment> {
    if comment.body.trim().is_empty() {
      return Err(JiraError::invalid_field("body", "Comment body cannot be empty"));
    }

    let locator = target.into().resolve(Issue::comments_locator);
    let request = ApiRequest::post(locator.url().clone()).json(serde_json::to_value(comment).map_err(|e| {
      JiraError::transport_with("Failed to serialize comment", e)
    })?);
    let created: Comment = self.send_json(request, &format!("add comment at {locator}")).await?;
    info!("Added comment {} at {}", created.id, locator);

    Ok(created)
  }

  /// Get the comments of an issue
  #[instrument(skip(self, target), level = "debug")]
  pub async fn get_comments<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<Vec<Comment>> {
    let locator = target.into().resolve(Issue::comments_locator);

    let page: CommentPage = self
      .send_json(ApiRequest::get(locator.url().clone()), &format!("comments at {locator}"))
      .await?;
    debug!("{} comments at {}", page.comments.len(), locator);

    Ok(page.comments)
  }

  /// Log work against an issue
  #[instrument(skip(self, target), level = "debug")]
  pub async fn add_worklog<'a>(&self, target: impl Into<IssueTarget<'a>>, worklog: &WorklogInput) -> Result<Worklog> {
    if worklog.time_spent_seconds == 0 {
      return Err(JiraError::invalid_field("timeSpentSeconds", "Time spent must be positive"));
    }

    let locator = target.into().resolve(Issue::worklog_locator);
    let mut request = ApiRequest::post(locator.url().clone()).json(worklog.to_payload());
    for (key, value) in worklog.adjust_estimate.query_pairs() {
      request = request.query(key, value);
    }

    let created: Worklog = self.send_json(request, &format!("add worklog at {locator}")).await?;
    info!("Logged {}s as worklog {} at {}", worklog.time_spent_seconds, created.id, locator);

    Ok(created)
  }

  /// Get the worklogs of an issue
  #[instrument(skip(self, target), level = "debug")]
  pub async fn get_worklogs<'a>(&self, target: impl Into<IssueTarget<'a>>) -> Result<Vec<Worklog>> {
    let locator = target.into().resolve(Issue::worklog_locator);

    let page: WorklogPage = self
      .send_json(ApiRequest::get(locator.url().clone()), &format!("worklogs at {locator}"))
      .await?;
    debug!("{} worklogs at {}", page.worklogs.len(), locator);

    Ok(page.worklogs)
  }

  /// Upload a file as an attachment
  #[instrument(skip(self, target, bytes), fields(size = bytes.len()), level = "debug")]
  pub async fn add_attachment<'a>(
    &self,
    target: impl Into<IssueTarget<'a>>,
    filename: &str,
    bytes: Vec<u8>,
  ) -> Result<Vec<Attachment>> {
    if filename.trim().is_empty() {
      return Err(JiraError::invalid_field("filename", "Attachment file name cannot be empty"));
    }

    let locator = target.into().resolve(Issue::attachments_locator);
    let request = ApiRequest::post(locator.url().clone())
      .header(ATLASSIAN_TOKEN_HEADER, ATLASSIAN_TOKEN_NO_CHECK)
      .file(filename, bytes);
    let attachments: Vec<Attachment> = self
      .send_json(request, &format!("attach '{filename}' at {locator}"))
      .await?;
    info!("Attached '{}' at {}", filename, locator);

    Ok(attachments)
  }

  /// Link two issues
  #[instrument(skip(self), level = "debug")]
  pub async fn link_issue(&self, link: &LinkIssuesInput) -> Result<()> {
    if link.link_type.trim().is_empty() {
      return Err(JiraError::invalid_field("type", "Link type cannot be empty"));
    }
    require_key(&link.inward_key)?;
    require_key(&link.outward_key)?;

    let request = ApiRequest::post(self.api_url(&["issueLink"])?).json(link.to_payload());
    self
      .send(
        request,
        &format!("link {} -> {}", link.inward_key, link.outward_key),
      )
      .await?;
    info!(
      "Linked {} to {} ({})",
      link.inward_key, link.outward_key, link.link_type
    );

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::{FixedOffset, TimeZone};
  use serde_json::json;
  use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
  use wiremock::{Mock, ResponseTemplate};

  use crate::endpoints::test_support::{issue, mock_client};
  use crate::error::ErrorKind;
  use crate::models::{AdjustEstimate, CommentInput, LinkIssuesInput, Visibility, WorklogInput};

  #[tokio::test]
  async fn test_add_comment_via_issue_or_locator() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/10000/comment"))
      .and(body_json(json!({ "body": "Looks good", "visibility": { "type": "role", "value": "Developers" } })))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({
          "id": "10100",
          "body": "Looks good",
          "author": { "name": "test_user", "displayName": "Test User" },
          "visibility": { "type": "role", "value": "Developers" }
      })))
      .expect(2)
      .mount(&mock_server)
      .await;

    let input = CommentInput::new("Looks good").with_visibility(Visibility::role("Developers"));
    let comment = client.add_comment(&issue, &input).await?;
    assert_eq!(comment.id, 10100);
    assert_eq!(comment.visibility, Some(Visibility::role("Developers")));

    client.add_comment(issue.comments_locator(), &input).await?;

    let err = client.add_comment(&issue, &CommentInput::new(" ")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    Ok(())
  }

  #[tokio::test]
  async fn test_get_comments() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/10000/comment"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "startAt": 0,
          "maxResults": 50,
          "total": 2,
          "comments": [
              { "id": "1", "body": "first" },
              { "id": "2", "body": "second" }
          ]
      })))
      .mount(&mock_server)
      .await;

    let comments = client.get_comments(&issue).await?;
    assert_eq!(comments.iter().map(|c| c.body.as_str()).collect::<Vec<_>>(), vec!["first", "second"]);

    Ok(())
  }

  #[tokio::test]
  async fn test_add_worklog() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/10000/worklog"))
      .and(query_param("adjustEstimate", "manual"))
      .and(query_param("reduceBy", "1h"))
      .and(body_json(json!({
          "started": "2024-03-01T09:00:00.000+0100",
          "timeSpentSeconds": 3600,
          "comment": "Pairing"
      })))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({
          "id": "100028",
          "comment": "Pairing",
          "started": "2024-03-01T09:00:00.000+0100",
          "timeSpent": "1h",
          "timeSpentSeconds": 3600
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let started = FixedOffset::east_opt(3600).unwrap().with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let input = WorklogInput::new(started, 3600)
      .with_comment("Pairing")
      .with_adjust_estimate(AdjustEstimate::Manual("1h".to_string()));
    let worklog = client.add_worklog(&issue, &input).await?;
    assert_eq!(worklog.id, 100028);
    assert_eq!(worklog.time_spent_seconds, 3600);

    let err = client
      .add_worklog(&issue, &WorklogInput::new(started, 0))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    Ok(())
  }

  #[tokio::test]
  async fn test_get_worklogs() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/10000/worklog"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "worklogs": [{ "id": 7, "timeSpentSeconds": 60 }]
      })))
      .mount(&mock_server)
      .await;

    let worklogs = client.get_worklogs(issue.worklog_locator()).await?;
    assert_eq!(worklogs.len(), 1);
    assert_eq!(worklogs[0].id, 7);

    Ok(())
  }

  #[tokio::test]
  async fn test_add_attachment() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;
    let issue = issue(&mock_server, 10000, "TEST-1");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/10000/attachments"))
      .and(header("X-Atlassian-Token", "no-check"))
      .and(body_string_contains("filename=\"notes.txt\""))
      .and(body_string_contains("hello attachment"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
          "id": "10200",
          "filename": "notes.txt",
          "size": 16,
          "mimeType": "text/plain"
      }])))
      .expect(1)
      .mount(&mock_server)
      .await;

    let attachments = client
      .add_attachment(&issue, "notes.txt", b"hello attachment".to_vec())
      .await?;
    assert_eq!(attachments[0].filename, "notes.txt");
    assert_eq!(attachments[0].size, 16);

    Ok(())
  }

  #[tokio::test]
  async fn test_link_issue() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issueLink"))
      .and(body_json(json!({
          "type": { "name": "Blocks" },
          "inwardIssue": { "key": "TEST-1" },
          "outwardIssue": { "key": "TEST-2" },
          "comment": { "body": "Blocked on the schema change" }
      })))
      .respond_with(ResponseTemplate::new(201))
      .expect(1)
      .mount(&mock_server)
      .await;

    let link =
      LinkIssuesInput::new("Blocks", "TEST-1", "TEST-2").with_comment(CommentInput::new("Blocked on the schema change"));
    client.link_issue(&link).await?;

    let err = client
      .link_issue(&LinkIssuesInput::new("Blocks", "", "TEST-2"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    Ok(())
  }

  #[tokio::test]
  async fn test_link_to_missing_issue() -> anyhow::Result<()> {
    let (mock_server, client) = mock_client().await;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issueLink"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({
          "errorMessages": ["Issue Does Not Exist"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client
      .link_issue(&LinkIssuesInput::new("Blocks", "TEST-1", "GONE-9"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
  }
}
