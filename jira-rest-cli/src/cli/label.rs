//! # Label Command

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use jira_rest::JiraClient;

use crate::clients;
use crate::output::print_success;

#[derive(Args)]
pub struct LabelArgs {
  #[command(subcommand)]
  pub subcommand: LabelSubcommands,
}

#[derive(Subcommand)]
pub enum LabelSubcommands {
  /// Add a label; adding one the issue already has is a no-op
  Add {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The label, without whitespace
    #[arg(required = true, index = 2)]
    label: String,
  },

  /// Remove a label; removing one the issue does not have is a no-op
  Remove {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The label to remove
    #[arg(required = true, index = 2)]
    label: String,
  },
}

pub fn handle_label_command(args: LabelArgs) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;

  match args.subcommand {
    LabelSubcommands::Add { issue_key, label } => {
      rt.block_on(edit_label(&jira_client, &issue_key, &label, true))?;
      print_success(&format!("Label '{label}' is on {issue_key}"));
    }
    LabelSubcommands::Remove { issue_key, label } => {
      rt.block_on(edit_label(&jira_client, &issue_key, &label, false))?;
      print_success(&format!("Label '{label}' is not on {issue_key}"));
    }
  }

  Ok(())
}

async fn edit_label(jira_client: &JiraClient, issue_key: &str, label: &str, add: bool) -> Result<()> {
  let issue = jira_client
    .get_issue(issue_key)
    .await
    .with_context(|| format!("Failed to fetch issue {issue_key}"))?;

  let edited = if add {
    jira_client.add_label(&issue, label).await
  } else {
    jira_client.remove_label(&issue, label).await
  };
  edited.with_context(|| format!("Failed to update labels of {issue_key}"))
}
