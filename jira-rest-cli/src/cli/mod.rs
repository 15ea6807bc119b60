//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches each subcommand to its handler.

mod assignable;
mod comment;
mod issue;
mod label;
mod social;
mod transitions;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};

use crate::output::ColorMode;

/// Top-level CLI command for jrc
#[derive(Parser)]
#[command(name = "jrc")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Work with Jira issues from the command line")]
#[command(
  long_about = "jrc drives the Jira REST API: view and delete issues, move them through\n\
        their workflow, edit labels, vote, watch and comment.\n\n\
        The host and credentials come from JIRA_HOST, JIRA_USER and JIRA_API_TOKEN,\n\
        or from ~/.netrc when the user and token are not set."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for jrc
#[derive(Subcommand)]
pub enum Commands {
  /// Find users an issue can be assigned to
  Assignable(assignable::AssignableArgs),

  /// Add a comment to an issue
  Comment(comment::CommentArgs),

  /// Show or delete issues
  #[command(arg_required_else_help = true)]
  Issue(issue::IssueArgs),

  /// Add or remove labels
  #[command(arg_required_else_help = true)]
  Label(label::LabelArgs),

  /// List or apply workflow transitions
  #[command(alias = "tr")]
  #[command(arg_required_else_help = true)]
  Transitions(transitions::TransitionsArgs),

  /// Withdraw your vote from an issue
  Unvote(social::IssueKeyArg),

  /// Stop watching an issue
  Unwatch(social::IssueKeyArg),

  /// Vote for an issue
  Vote(social::IssueKeyArg),

  /// Watch an issue
  Watch(social::IssueKeyArg),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Assignable(args) => assignable::handle_assignable_command(args),
    Commands::Comment(args) => comment::handle_comment_command(args),
    Commands::Issue(args) => issue::handle_issue_command(args),
    Commands::Label(args) => label::handle_label_command(args),
    Commands::Transitions(args) => transitions::handle_transitions_command(args),
    Commands::Unvote(args) => social::handle_unvote_command(args),
    Commands::Unwatch(args) => social::handle_unwatch_command(args),
    Commands::Vote(args) => social::handle_vote_command(args),
    Commands::Watch(args) => social::handle_watch_command(args),
  }
}
