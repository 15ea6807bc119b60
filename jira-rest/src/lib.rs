//! # Jira REST Client
//!
//! Typed access to the Jira REST API (v2): issues and their lifecycle
//! transitions, watchers and votes, comments, worklogs, attachments, links,
//! bulk creation and single-field edits.
//!
//! Sub-resources of an issue are never addressed by building URLs from its
//! key. They are reached through [`ResourceLocator`]s taken from the issue
//! representation the server returned, or through the [`Issue`] itself via
//! [`IssueTarget`].

pub mod auth;
mod client;
pub mod config;
pub mod consts;
mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use config::{ConfigError, JiraConfig};
pub use error::{ErrorCollection, ErrorKind, JiraError, Result};
// Re-export models
pub use models::{
  AdjustEstimate, Assignee, Attachment, BasicIssue, BulkOperationResult, CimIssueType, CimProject, Comment,
  CommentInput, CustomField, EditMetadata, FieldInfo, FieldKey, FieldSchema, GetCreateIssueMetadataOptions, Issue,
  IssueInput, IssueTarget, JiraAuth, LinkIssuesInput, Page, ResourceLocator, StandardField, Status, Transition,
  TransitionInput, User, Visibility, Votes, Watchers, Worklog, WorklogInput,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport};
