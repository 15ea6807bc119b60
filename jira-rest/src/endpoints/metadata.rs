use tracing::{debug, instrument};

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::metadata::CreateMetadata;
use crate::models::{CimProject, GetCreateIssueMetadataOptions};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> JiraClient<T> {
  /// Get the projects, issue types and fields the caller can create issues
  /// with. Nothing is cached; every call asks the server.
  #[instrument(skip(self), level = "debug")]
  pub async fn get_create_issue_metadata(&self, options: &GetCreateIssueMetadataOptions) -> Result<Vec<CimProject>> {
    let mut request = ApiRequest::get(self.api_url(&["issue", "createmeta"])?);
    for (key, value) in options.query_pairs() {
      request = request.query(key, value);
    }

    let metadata: CreateMetadata = self.send_json(request, "create metadata").await?;
    debug!("Create metadata covers {} projects", metadata.projects.len());

    Ok(metadata.projects)
  }
}
