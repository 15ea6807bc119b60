use tracing::{debug, instrument, warn};

use crate::client::JiraClient;
use crate::endpoints::require_key;
use crate::error::Result;
use crate::models::{Page, User};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> JiraClient<T> {
  /// Get the authenticated user
  #[instrument(skip(self), level = "debug")]
  pub async fn get_current_user(&self) -> Result<User> {
    let request = ApiRequest::get(self.api_url(&["myself"])?);
    self.send_json(request, "current user").await
  }

  /// Get the users an issue can be assigned to.
  ///
  /// Page sizes above the server ceiling are clamped, and a server that
  /// returns more than was asked for is truncated.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_assignable_users(&self, issue_key: &str, page: Page) -> Result<Vec<User>> {
    let issue_key = require_key(issue_key)?;
    let max_results = page.effective_max_results();
    if max_results < page.max_results {
      warn!(
        "Requested page size {} exceeds the server limit, using {}",
        page.max_results, max_results
      );
    }

    let request = ApiRequest::get(self.api_url(&["user", "assignable", "search"])?)
      .query("issueKey", issue_key)
      .query("startAt", page.start_at)
      .query("maxResults", max_results);
    let mut users: Vec<User> = self
      .send_json(request, &format!("assignable users for {issue_key}"))
      .await?;

    users.truncate(max_results as usize);
    debug!("{} assignable users for {}", users.len(), issue_key);

    Ok(users)
  }
}
