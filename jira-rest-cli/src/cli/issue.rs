//! # Issue Command
//!
//! Show and delete issues.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::clients;
use crate::output::{issue_json, print_json, print_success};

#[derive(Args)]
pub struct IssueArgs {
  #[command(subcommand)]
  pub subcommand: IssueSubcommands,
}

#[derive(Subcommand)]
pub enum IssueSubcommands {
  /// Show an issue as JSON
  Show {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Extra expansions to request (e.g., changelog)
    #[arg(long, value_delimiter = ',')]
    expand: Vec<String>,
  },

  /// Delete an issue
  #[command(long_about = "Delete a Jira issue.\n\n\
                     Issues with subtasks are only deleted when --delete-subtasks is given,\n\
                     in which case the subtasks are deleted too.")]
  Delete {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// Also delete the issue's subtasks
    #[arg(long)]
    delete_subtasks: bool,
  },
}

pub fn handle_issue_command(args: IssueArgs) -> Result<()> {
  match args.subcommand {
    IssueSubcommands::Show { issue_key, expand } => handle_show_command(&issue_key, &expand),
    IssueSubcommands::Delete {
      issue_key,
      delete_subtasks,
    } => handle_delete_command(&issue_key, delete_subtasks),
  }
}

fn handle_show_command(issue_key: &str, expand: &[String]) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let expand: Vec<&str> = expand.iter().map(String::as_str).collect();

  let issue = rt
    .block_on(jira_client.get_issue_with(issue_key, &expand))
    .with_context(|| format!("Failed to fetch issue {issue_key}"))?;

  print_json(&issue_json(&issue))
}

fn handle_delete_command(issue_key: &str, delete_subtasks: bool) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;

  rt.block_on(jira_client.delete_issue(issue_key, delete_subtasks))
    .with_context(|| format!("Failed to delete issue {issue_key}"))?;

  print_success(&format!("Deleted issue {issue_key}"));
  Ok(())
}
