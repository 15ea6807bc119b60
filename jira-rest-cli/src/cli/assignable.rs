//! # Assignable Users Command

use anyhow::{Context, Result};
use clap::Args;
use jira_rest::Page;
use serde_json::Value;

use crate::clients;
use crate::output::{print_json, print_warning, user_json};

#[derive(Args)]
pub struct AssignableArgs {
  /// The Jira issue key (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,

  /// Index of the first user to return
  #[arg(long, default_value_t = 0)]
  pub start_at: u32,

  /// Page size; values above the server limit are clamped
  #[arg(long, default_value_t = 50)]
  pub max_results: u32,
}

pub fn handle_assignable_command(args: AssignableArgs) -> Result<()> {
  let page = Page::new(args.start_at, args.max_results);
  if page.effective_max_results() < args.max_results {
    print_warning(&format!(
      "Page size {} is above the server limit; using {}",
      args.max_results,
      page.effective_max_results()
    ));
  }

  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let users = rt
    .block_on(jira_client.get_assignable_users(&args.issue_key, page))
    .with_context(|| format!("Failed to find assignable users for {}", args.issue_key))?;

  print_json(&Value::Array(users.iter().map(user_json).collect()))
}
