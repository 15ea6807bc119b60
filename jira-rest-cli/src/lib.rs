//! # jrc
//!
//! Command-line front end for the `jira-rest` client. Commands print JSON on
//! stdout and status lines on stderr so output can be piped.

pub mod cli;
mod clients;
pub mod output;
