//! # Bulk Issue Creation
//!
//! One request creates many issues. The server reports failures per item;
//! this module lines them up with the submitted batch so slot `i` of the
//! result always describes item `i`.

use reqwest::StatusCode;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::client::{JiraClient, decode};
use crate::error::{ErrorCollection, JiraError, Result};
use crate::models::bulk::BulkResponse;
use crate::models::{BasicIssue, BulkOperationResult, IssueInput};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> JiraClient<T> {
  /// Create many issues in one request.
  ///
  /// Per-item failures land in their own slot and leave the other items
  /// alone. Failures of the exchange as a whole (transport, authentication,
  /// or a response that cannot be matched to the batch) fail the call.
  #[instrument(skip(self, batch), fields(batch_len = batch.len()), level = "debug")]
  pub async fn create_issues(&self, batch: &[IssueInput]) -> Result<BulkOperationResult<BasicIssue>> {
    if batch.is_empty() {
      return Ok(BulkOperationResult::empty());
    }

    let updates: Vec<_> = batch.iter().map(IssueInput::to_payload).collect();
    let request = ApiRequest::post(self.api_url(&["issue", "bulk"])?).json(json!({ "issueUpdates": updates }));
    let response = self.transport.execute(request).await?;

    // A batch where every item failed comes back as 400 with the same body
    // shape as a partial success.
    let body = if response.status.is_success() {
      decode::<BulkResponse<BasicIssue>>(&response, "bulk create")?
    } else if response.status == StatusCode::BAD_REQUEST
      && let Ok(body) = serde_json::from_str::<BulkResponse<BasicIssue>>(&response.body)
      && !body.errors.is_empty()
    {
      body
    } else {
      let details = ErrorCollection::from_body(response.status, &response.body);
      warn!("Bulk create rejected: HTTP {} {}", response.status, details);
      return Err(JiraError::from_status(response.status, details, "bulk create"));
    };

    let result = body.reconcile(batch.len())?;
    info!(
      "Bulk create: {} of {} issues created",
      result.successes().count(),
      batch.len()
    );

    Ok(result)
  }
}
