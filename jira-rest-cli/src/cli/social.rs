//! # Vote and Watch Commands
//!
//! Votes and watches are not idempotent: voting twice or unwatching an issue
//! you do not watch is reported as an error.

use anyhow::{Context, Result};
use clap::Args;
use jira_rest::{Issue, JiraClient};

use crate::clients;
use crate::output::{print_json, print_success, votes_json, watchers_json};

#[derive(Args)]
pub struct IssueKeyArg {
  /// The Jira issue key (e.g., PROJ-123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,
}

#[derive(Clone, Copy)]
enum SocialAction {
  Vote,
  Unvote,
  Watch,
  Unwatch,
}

impl SocialAction {
  const fn past_tense(self) -> &'static str {
    match self {
      SocialAction::Vote => "Voted for",
      SocialAction::Unvote => "Withdrew vote from",
      SocialAction::Watch => "Watching",
      SocialAction::Unwatch => "Stopped watching",
    }
  }

  const fn affects_votes(self) -> bool {
    matches!(self, SocialAction::Vote | SocialAction::Unvote)
  }
}

pub fn handle_vote_command(args: IssueKeyArg) -> Result<()> {
  run(&args.issue_key, SocialAction::Vote)
}

pub fn handle_unvote_command(args: IssueKeyArg) -> Result<()> {
  run(&args.issue_key, SocialAction::Unvote)
}

pub fn handle_watch_command(args: IssueKeyArg) -> Result<()> {
  run(&args.issue_key, SocialAction::Watch)
}

pub fn handle_unwatch_command(args: IssueKeyArg) -> Result<()> {
  run(&args.issue_key, SocialAction::Unwatch)
}

fn run(issue_key: &str, action: SocialAction) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let summary = rt.block_on(apply(&jira_client, issue_key, action))?;

  print_success(&format!("{} {issue_key}", action.past_tense()));
  print_json(&summary)
}

/// Apply the action, then return the resulting vote or watcher summary
async fn apply(jira_client: &JiraClient, issue_key: &str, action: SocialAction) -> Result<serde_json::Value> {
  let issue: Issue = jira_client
    .get_issue(issue_key)
    .await
    .with_context(|| format!("Failed to fetch issue {issue_key}"))?;

  let outcome = match action {
    SocialAction::Vote => jira_client.vote(&issue).await,
    SocialAction::Unvote => jira_client.unvote(&issue).await,
    SocialAction::Watch => jira_client.watch(&issue).await,
    SocialAction::Unwatch => jira_client.unwatch(&issue).await,
  };
  outcome.with_context(|| format!("{} {issue_key} failed", action.past_tense()))?;

  let summary = if action.affects_votes() {
    votes_json(&jira_client.get_votes(&issue).await?)
  } else {
    watchers_json(&jira_client.get_watchers(&issue).await?)
  };
  Ok(summary)
}
