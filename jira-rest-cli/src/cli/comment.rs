//! # Comment Command

use anyhow::{Context, Result};
use clap::Args;
use jira_rest::{CommentInput, JiraClient, Visibility};

use crate::clients;
use crate::output::{comment_json, print_json};

#[derive(Args)]
pub struct CommentArgs {
  /// The Jira issue key (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,

  /// The comment body
  #[arg(required = true, index = 2)]
  pub body: String,

  /// Only show the comment to members of this project role
  #[arg(long, conflicts_with = "group")]
  pub role: Option<String>,

  /// Only show the comment to members of this group
  #[arg(long)]
  pub group: Option<String>,
}

pub fn handle_comment_command(args: CommentArgs) -> Result<()> {
  let mut input = CommentInput::new(&args.body);
  if let Some(role) = &args.role {
    input = input.with_visibility(Visibility::role(role));
  } else if let Some(group) = &args.group {
    input = input.with_visibility(Visibility::group(group));
  }

  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let comment = rt.block_on(add_comment(&jira_client, &args.issue_key, &input))?;

  print_json(&comment_json(&comment))
}

async fn add_comment(jira_client: &JiraClient, issue_key: &str, input: &CommentInput) -> Result<jira_rest::Comment> {
  let issue = jira_client
    .get_issue(issue_key)
    .await
    .with_context(|| format!("Failed to fetch issue {issue_key}"))?;

  jira_client
    .add_comment(&issue, input)
    .await
    .with_context(|| format!("Failed to comment on {issue_key}"))
}
