//! # Transitions Command
//!
//! Lists the transitions available from an issue's current status and applies
//! one of them, by id or by name.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use jira_rest::{CommentInput, JiraClient, Transition, TransitionInput};
use serde_json::Value;

use crate::clients;
use crate::output::{print_info, print_json, print_success, transition_json};

#[derive(Args)]
pub struct TransitionsArgs {
  #[command(subcommand)]
  pub subcommand: TransitionsSubcommands,
}

#[derive(Subcommand)]
pub enum TransitionsSubcommands {
  /// List the transitions available for an issue
  List {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,
  },

  /// Move an issue through a transition
  #[command(long_about = "Apply a workflow transition to an issue.\n\n\
                     The transition is matched by id, or by name ignoring case. Fields the\n\
                     transition screen requires are passed as --field id=JSON.")]
  Apply {
    /// The Jira issue key (e.g., PROJ-123)
    #[arg(required = true, index = 1)]
    issue_key: String,

    /// The transition id or name
    #[arg(required = true, index = 2)]
    transition: String,

    /// A field to set during the transition, as id=JSON
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// A comment to add with the transition
    #[arg(long)]
    comment: Option<String>,
  },
}

pub fn handle_transitions_command(args: TransitionsArgs) -> Result<()> {
  match args.subcommand {
    TransitionsSubcommands::List { issue_key } => handle_list_command(&issue_key),
    TransitionsSubcommands::Apply {
      issue_key,
      transition,
      fields,
      comment,
    } => handle_apply_command(&issue_key, &transition, fields, comment.as_deref()),
  }
}

/// Parse `id=JSON`; a value that is not valid JSON is taken as a string.
pub(crate) fn parse_field(raw: &str) -> Result<(String, Value), String> {
  let (id, value) = raw
    .split_once('=')
    .ok_or_else(|| format!("expected id=value, got '{raw}'"))?;
  let id = id.trim();
  if id.is_empty() {
    return Err(format!("missing field id in '{raw}'"));
  }

  let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
  Ok((id.to_string(), value))
}

fn find_transition<'a>(transitions: &'a [Transition], wanted: &str) -> Option<&'a Transition> {
  transitions
    .iter()
    .find(|t| t.id == wanted)
    .or_else(|| transitions.iter().find(|t| t.name.eq_ignore_ascii_case(wanted)))
}

fn handle_list_command(issue_key: &str) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;

  let transitions = rt
    .block_on(list_transitions(&jira_client, issue_key))
    .with_context(|| format!("Failed to fetch transitions for {issue_key}"))?;

  if transitions.is_empty() {
    print_info(&format!("No transitions available for {issue_key}"));
  }
  print_json(&Value::Array(transitions.iter().map(transition_json).collect()))
}

async fn list_transitions(jira_client: &JiraClient, issue_key: &str) -> jira_rest::Result<Vec<Transition>> {
  let issue = jira_client.get_issue(issue_key).await?;
  jira_client.get_transitions(&issue).await
}

fn handle_apply_command(
  issue_key: &str,
  wanted: &str,
  fields: Vec<(String, Value)>,
  comment: Option<&str>,
) -> Result<()> {
  let (rt, jira_client) = clients::create_jira_runtime_and_client()?;
  let applied = rt.block_on(apply_transition(&jira_client, issue_key, wanted, fields, comment))?;

  print_success(&format!("Moved {issue_key} through '{applied}'"));
  Ok(())
}

/// Apply the matching transition and return its name
async fn apply_transition(
  jira_client: &JiraClient,
  issue_key: &str,
  wanted: &str,
  fields: Vec<(String, Value)>,
  comment: Option<&str>,
) -> Result<String> {
  let issue = jira_client
    .get_issue(issue_key)
    .await
    .with_context(|| format!("Failed to fetch issue {issue_key}"))?;
  let transitions = jira_client
    .get_transitions(&issue)
    .await
    .with_context(|| format!("Failed to fetch transitions for {issue_key}"))?;

  let transition = find_transition(&transitions, wanted).ok_or_else(|| {
    let available: Vec<String> = transitions.iter().map(|t| format!("{} ({})", t.name, t.id)).collect();
    anyhow!(
      "Transition '{wanted}' is not available for {issue_key}; available: {}",
      available.join(", ")
    )
  })?;

  let mut input = TransitionInput::new(transition.id.as_str());
  for (id, value) in fields {
    input = input.with_field(&id, value);
  }
  if let Some(body) = comment {
    input = input.with_comment(CommentInput::new(body));
  }

  jira_client
    .transition(&issue, &input)
    .await
    .with_context(|| format!("Failed to apply '{}' to {issue_key}", transition.name))?;

  Ok(transition.name.clone())
}
