//! An in-memory Jira holding a single issue, served through wiremock.
//!
//! Unlike per-test canned responses, the fake keeps state between requests so
//! a mutation is visible on the next fetch.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use jira_rest::JiraClient;
use jira_rest_test_utils::fixtures;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ISSUE_ID: u64 = 10000;
pub const ISSUE_KEY: &str = "TEST-1";
pub const SUBTASK_KEY: &str = "TEST-2";

#[derive(Debug, Default)]
struct IssueState {
  summary: String,
  labels: BTreeSet<String>,
  has_voted: bool,
  has_subtask: bool,
  deleted: bool,
}

type Shared = Arc<Mutex<IssueState>>;

fn lock(state: &Shared) -> MutexGuard<'_, IssueState> {
  state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected(message: &str) -> ResponseTemplate {
  ResponseTemplate::new(400).set_body_json(json!({ "errorMessages": [message], "errors": {} }))
}

fn missing_field(field: &str, message: &str) -> Value {
  json!({ "errorMessages": [], "errors": { field: message } })
}

async fn mount(server: &MockServer, verb: &str, route: &str, responder: impl Respond + 'static) {
  Mock::given(method(verb))
    .and(path(route))
    .respond_with(responder)
    .mount(server)
    .await;
}

pub struct FakeJira {
  pub server: MockServer,
  state: Shared,
}

impl FakeJira {
  pub async fn start() -> Self {
    let server = MockServer::start().await;
    let state: Shared = Arc::new(Mutex::new(IssueState {
      summary: "Test issue".to_string(),
      ..IssueState::default()
    }));
    let base = server.uri();
    let issue_path = format!("/rest/api/2/issue/{ISSUE_KEY}");
    let self_path = format!("/rest/api/2/issue/{ISSUE_ID}");

    mount(&server, "GET", &issue_path, GetIssue(state.clone(), base.clone())).await;
    mount(&server, "DELETE", &issue_path, DeleteIssue(state.clone())).await;
    mount(&server, "POST", "/rest/api/2/issue", CreateIssue(state.clone(), base.clone())).await;
    mount(&server, "POST", "/rest/api/2/issue/bulk", BulkCreate(base.clone())).await;
    mount(&server, "PUT", &self_path, UpdateIssue(state.clone())).await;
    mount(&server, "GET", &format!("{self_path}/transitions"), ListTransitions).await;
    mount(&server, "POST", &format!("{self_path}/transitions"), ApplyTransition).await;
    mount(&server, "GET", &format!("{issue_path}/votes"), GetVotes(state.clone())).await;
    mount(&server, "POST", &format!("{issue_path}/votes"), SetVote(state.clone(), true)).await;
    mount(&server, "DELETE", &format!("{issue_path}/votes"), SetVote(state.clone(), false)).await;
    mount(&server, "GET", "/rest/api/2/user/assignable/search", AssignableUsers).await;

    Self { server, state }
  }

  pub fn client(&self) -> JiraClient {
    jira_rest::create_jira_client(&self.server.uri(), "test_user", "test_token").unwrap()
  }

  pub fn give_subtask(&self) {
    lock(&self.state).has_subtask = true;
  }

  pub fn vote_directly(&self) {
    lock(&self.state).has_voted = true;
  }

  /// Requests the server received for `verb` on paths ending in `suffix`
  pub async fn requests(&self, verb: &str, suffix: &str) -> usize {
    self
      .server
      .received_requests()
      .await
      .unwrap_or_default()
      .iter()
      .filter(|r| r.method.as_str() == verb && r.url.path().ends_with(suffix))
      .count()
  }
}

struct GetIssue(Shared, String);

impl Respond for GetIssue {
  fn respond(&self, _request: &Request) -> ResponseTemplate {
    let state = lock(&self.0);
    if state.deleted {
      return ResponseTemplate::new(404).set_body_json(json!({
        "errorMessages": ["Issue Does Not Exist"],
        "errors": {}
      }));
    }

    let api = fixtures::api(&self.1);
    let subtasks = if state.has_subtask {
      json!([{ "id": "10001", "key": SUBTASK_KEY, "self": format!("{api}/issue/10001") }])
    } else {
      json!([])
    };
    let body = fixtures::with_fields(
      fixtures::issue_json(&self.1, ISSUE_ID, ISSUE_KEY),
      json!({
        "summary": state.summary,
        "labels": state.labels,
        "subtasks": subtasks,
        "votes": {
          "self": format!("{api}/issue/{ISSUE_KEY}/votes"),
          "votes": u32::from(state.has_voted),
          "hasVoted": state.has_voted
        }
      }),
    );
    ResponseTemplate::new(200).set_body_json(body)
  }
}

struct DeleteIssue(Shared);

impl Respond for DeleteIssue {
  fn respond(&self, request: &Request) -> ResponseTemplate {
    let delete_subtasks = request
      .url
      .query_pairs()
      .any(|(key, value)| key == "deleteSubtasks" && value == "true");

    let mut state = lock(&self.0);
    if state.deleted {
      return ResponseTemplate::new(404);
    }
    if state.has_subtask && !delete_subtasks {
      return rejected("The issue has subtasks. Use deleteSubtasks=true to delete them as well.");
    }
    state.deleted = true;
    ResponseTemplate::new(204)
  }
}

struct CreateIssue(Shared, String);

impl Respond for CreateIssue {
  fn respond(&self, request: &Request) -> ResponseTemplate {
    let Ok(body) = request.body_json::<Value>() else {
      return rejected("Unreadable body");
    };
    let fields = &body["fields"];
    let Some(summary) = fields["summary"].as_str() else {
      return ResponseTemplate::new(400).set_body_json(missing_field("summary", "You must specify a summary of the issue."));
    };

    let mut state = lock(&self.0);
    state.summary = summary.to_string();
    state.labels = fields["labels"]
      .as_array()
      .map(|labels| labels.iter().filter_map(Value::as_str).map(str::to_string).collect())
      .unwrap_or_default();
    state.deleted = false;

    ResponseTemplate::new(201).set_body_json(fixtures::created_json(&self.1, ISSUE_ID, ISSUE_KEY))
  }
}

/// Creates every item that has a summary, numbering keys by position
struct BulkCreate(String);

impl Respond for BulkCreate {
  fn respond(&self, request: &Request) -> ResponseTemplate {
    let Ok(body) = request.body_json::<Value>() else {
      return rejected("Unreadable body");
    };
    let updates = body["issueUpdates"].as_array().cloned().unwrap_or_default();

    let mut issues = Vec::new();
    let mut errors = Vec::new();
    for (slot, update) in updates.iter().enumerate() {
      if update["fields"]["summary"].as_str().is_some() {
        let number = 100 + slot as u64;
        issues.push(fixtures::created_json(&self.0, 20000 + number, &format!("TEST-{number}")));
      } else {
        errors.push(json!({
          "status": 400,
          "elementErrors": missing_field("summary", "You must specify a summary of the issue."),
          "failedElementNumber": slot
        }));
      }
    }

    let status = if issues.is_empty() { 400 } else { 201 };
    ResponseTemplate::new(status).set_body_json(json!({ "issues": issues, "errors": errors }))
  }
}

/// Applies `update.labels` verbs and `fields.summary`
struct UpdateIssue(Shared);

impl Respond for UpdateIssue {
  fn respond(&self, request: &Request) -> ResponseTemplate {
    let Ok(body) = request.body_json::<Value>() else {
      return rejected("Unreadable body");
    };

    let mut state = lock(&self.0);
    if let Some(summary) = body["fields"]["summary"].as_str() {
      state.summary = summary.to_string();
    }
    for op in body["update"]["labels"].as_array().into_iter().flatten() {
      if let Some(label) = op["add"].as_str() {
        state.labels.insert(label.to_string());
      }
      if let Some(label) = op["remove"].as_str() {
        state.labels.remove(label);
      }
    }
    ResponseTemplate::new(204)
  }
}

struct ListTransitions;

impl Respond for ListTransitions {
  fn respond(&self, _request: &Request) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(fixtures::transitions_json())
  }
}

/// Accepts the ids `transitions_json` lists; "31" also needs a resolution
struct ApplyTransition;

impl Respond for ApplyTransition {
  fn respond(&self, request: &Request) -> ResponseTemplate {
    let Ok(body) = request.body_json::<Value>() else {
      return rejected("Unreadable body");
    };

    match body["transition"]["id"].as_str() {
      Some("11") => ResponseTemplate::new(204),
      Some("31") if body["fields"]["resolution"].is_object() => ResponseTemplate::new(204),
      Some("31") => ResponseTemplate::new(400).set_body_json(missing_field("resolution", "Resolution is required.")),
      Some(id) => rejected(&format!(
        "It seems that you have tried to perform a workflow operation ({id}) that is not valid for the current state of this issue."
      )),
      None => rejected("Missing transition id"),
    }
  }
}

struct GetVotes(Shared);

impl Respond for GetVotes {
  fn respond(&self, _request: &Request) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(fixtures::votes_json(lock(&self.0).has_voted))
  }
}

struct SetVote(Shared, bool);

impl Respond for SetVote {
  fn respond(&self, _request: &Request) -> ResponseTemplate {
    lock(&self.0).has_voted = self.1;
    ResponseTemplate::new(204)
  }
}

/// Ignores maxResults and returns more users than any page allows
struct AssignableUsers;

impl Respond for AssignableUsers {
  fn respond(&self, _request: &Request) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(fixtures::users_json(1500))
  }
}
