//! # Output Formatting
//!
//! JSON renderings of client results for stdout, plus colored status lines
//! for stderr.

use anyhow::{Context, Result};
use jira_rest::{Comment, Issue, Transition, User, Votes, Watchers};
use owo_colors::OwoColorize;
use serde_json::{Value, json};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply the mode to the global color override
  pub fn apply(self) {
    match self {
      ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
      ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
      // Leave detection to owo-colors
      ColorMode::Auto => {}
    }
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Pretty-print a JSON document on stdout
pub fn print_json(value: &Value) -> Result<()> {
  let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
  println!("{rendered}");
  Ok(())
}

pub fn user_json(user: &User) -> Value {
  json!({
    "name": user.name,
    "accountId": user.account_id,
    "displayName": user.display_name,
    "emailAddress": user.email_address,
    "active": user.active,
  })
}

pub fn issue_json(issue: &Issue) -> Value {
  let custom_fields: serde_json::Map<String, Value> = issue
    .custom_fields
    .iter()
    .map(|(name, field)| (name.clone(), field.value.clone()))
    .collect();

  json!({
    "id": issue.id,
    "key": issue.key,
    "self": issue.self_locator().to_string(),
    "summary": issue.summary,
    "description": issue.description,
    "status": issue.status.as_ref().map(|s| s.name.as_str()),
    "issueType": issue.issue_type.as_ref().map(|t| t.name.as_str()),
    "project": issue.project.as_ref().map(|p| p.key.as_str()),
    "priority": issue.priority.as_ref().map(|p| p.name.as_str()),
    "assignee": issue.assignee.as_ref().map(user_json),
    "reporter": issue.reporter.as_ref().map(user_json),
    "labels": issue.labels,
    "subtasks": issue.subtasks.iter().map(|s| s.key.as_str()).collect::<Vec<_>>(),
    "votes": issue.votes.map(|v| json!({ "votes": v.votes, "hasVoted": v.has_voted })),
    "watches": issue.watches.map(|w| json!({ "watchCount": w.watch_count, "isWatching": w.is_watching })),
    "customFields": custom_fields,
  })
}

pub fn transition_json(transition: &Transition) -> Value {
  json!({
    "id": transition.id,
    "name": transition.name,
    "to": transition.to.as_ref().map(|s| s.name.as_str()),
    "requiredFields": transition.required_fields().map(|f| f.id.as_str()).collect::<Vec<_>>(),
  })
}

pub fn comment_json(comment: &Comment) -> Value {
  json!({
    "id": comment.id,
    "body": comment.body,
    "author": comment.author.as_ref().map(user_json),
    "created": comment.created,
  })
}

pub fn votes_json(votes: &Votes) -> Value {
  json!({ "votes": votes.votes, "hasVoted": votes.has_voted })
}

pub fn watchers_json(watchers: &Watchers) -> Value {
  json!({
    "watchCount": watchers.watch_count,
    "isWatching": watchers.is_watching,
    "watchers": watchers.watchers.iter().map(user_json).collect::<Vec<_>>(),
  })
}
