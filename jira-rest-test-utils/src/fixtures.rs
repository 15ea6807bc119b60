//! JSON bodies shaped like Jira REST API responses
//!
//! Every `self` link is built from the `base` passed in, typically
//! `MockServer::uri()`, so locators taken from a fixture point back at the
//! mock server.

use serde_json::{Value, json};

/// API root below a base URL
pub fn api(base: &str) -> String {
  format!("{}/rest/api/2", base.trim_end_matches('/'))
}

/// A full issue representation with the `names` expansion
///
/// The issue lives at `issue/{id}`; the embedded votes and watches links use
/// the key form (`issue/{key}/votes`), as Jira does.
pub fn issue_json(base: &str, id: u64, key: &str) -> Value {
  let api = api(base);
  let project_key = key.split('-').next().unwrap_or(key);

  json!({
    "expand": "renderedFields,names,schema,transitions,editmeta,changelog",
    "id": id.to_string(),
    "key": key,
    "self": format!("{api}/issue/{id}"),
    "names": {
      "summary": "Summary",
      "status": "Status",
      "labels": "Labels",
      "customfield_10010": "Story Points",
      "customfield_10011": "Team"
    },
    "fields": {
      "summary": "Test issue",
      "description": "This is a test issue",
      "status": {
        "self": format!("{api}/status/1"),
        "id": "1",
        "name": "Open",
        "statusCategory": { "key": "new", "name": "To Do" }
      },
      "issuetype": { "id": "1", "name": "Bug", "subtask": false },
      "project": { "id": "10000", "key": project_key, "name": "Test Project" },
      "priority": { "id": "3", "name": "Medium" },
      "assignee": null,
      "reporter": user_json("reporter"),
      "labels": [],
      "subtasks": [],
      "issuelinks": [],
      "votes": {
        "self": format!("{api}/issue/{key}/votes"),
        "votes": 0,
        "hasVoted": false
      },
      "watches": {
        "self": format!("{api}/issue/{key}/watchers"),
        "watchCount": 0,
        "isWatching": false
      },
      "customfield_10010": null,
      "customfield_10011": null
    }
  })
}

/// Overwrite fields of an issue fixture
pub fn with_fields(mut issue: Value, fields: Value) -> Value {
  if let (Some(target), Value::Object(fields)) = (issue.get_mut("fields").and_then(Value::as_object_mut), fields) {
    target.extend(fields);
  }
  issue
}

/// Body returned by issue creation
pub fn created_json(base: &str, id: u64, key: &str) -> Value {
  json!({
    "id": id.to_string(),
    "key": key,
    "self": format!("{}/issue/{id}", api(base))
  })
}

/// Bulk creation response with the given successes and `(slot, field, message)`
/// failures
pub fn bulk_response_json(base: &str, created: &[(u64, &str)], failed: &[(usize, &str, &str)]) -> Value {
  let issues: Vec<Value> = created.iter().map(|(id, key)| created_json(base, *id, key)).collect();
  let errors: Vec<Value> = failed
    .iter()
    .map(|(slot, field, message)| {
      json!({
        "status": 400,
        "elementErrors": { "errorMessages": [], "errors": { *field: *message } },
        "failedElementNumber": slot
      })
    })
    .collect();

  json!({ "issues": issues, "errors": errors })
}

/// Two transitions: "Start Progress" without a screen and "Resolve" which
/// requires a resolution
pub fn transitions_json() -> Value {
  json!({
    "expand": "transitions",
    "transitions": [
      {
        "id": "11",
        "name": "Start Progress",
        "to": { "id": "3", "name": "In Progress" },
        "fields": {}
      },
      {
        "id": "31",
        "name": "Resolve",
        "to": { "id": "5", "name": "Resolved" },
        "fields": {
          "resolution": {
            "required": true,
            "name": "Resolution",
            "schema": { "type": "resolution", "system": "resolution" },
            "allowedValues": [{ "id": "1", "name": "Fixed" }, { "id": "2", "name": "Won't Fix" }]
          },
          "comment": {
            "required": false,
            "name": "Comment",
            "schema": { "type": "comment", "system": "comment" }
          }
        }
      }
    ]
  })
}

/// Edit metadata for the fixture issue
pub fn edit_meta_json() -> Value {
  json!({
    "fields": {
      "summary": {
        "required": true,
        "name": "Summary",
        "schema": { "type": "string", "system": "summary" },
        "operations": ["set"]
      },
      "description": {
        "required": false,
        "name": "Description",
        "schema": { "type": "string", "system": "description" },
        "operations": ["set"]
      },
      "labels": {
        "required": false,
        "name": "Labels",
        "schema": { "type": "array", "items": "string", "system": "labels" },
        "operations": ["add", "set", "remove"]
      },
      "assignee": {
        "required": false,
        "name": "Assignee",
        "schema": { "type": "user", "system": "assignee" },
        "operations": ["set"]
      },
      "priority": {
        "required": false,
        "name": "Priority",
        "schema": { "type": "priority", "system": "priority" },
        "operations": ["set"]
      },
      "customfield_10010": {
        "required": false,
        "name": "Story Points",
        "schema": {
          "type": "number",
          "custom": "com.atlassian.jira.plugin.system.customfieldtypes:float",
          "customId": 10010
        },
        "operations": ["set"]
      },
      "customfield_10011": {
        "required": true,
        "name": "Team",
        "schema": {
          "type": "option",
          "custom": "com.atlassian.jira.plugin.system.customfieldtypes:select",
          "customId": 10011
        },
        "operations": ["set"],
        "allowedValues": [{ "id": "1", "value": "Platform" }, { "id": "2", "value": "Mobile" }]
      }
    }
  })
}

/// Create metadata for project TEST with a Bug issue type
pub fn create_meta_json() -> Value {
  json!({
    "expand": "projects",
    "projects": [{
      "id": "10000",
      "key": "TEST",
      "name": "Test Project",
      "issuetypes": [{
        "id": "1",
        "name": "Bug",
        "subtask": false,
        "fields": {
          "summary": { "required": true, "name": "Summary", "schema": { "type": "string", "system": "summary" } },
          "issuetype": { "required": true, "name": "Issue Type", "schema": { "type": "issuetype", "system": "issuetype" } },
          "project": { "required": true, "name": "Project", "schema": { "type": "project", "system": "project" } },
          "labels": { "required": false, "name": "Labels", "schema": { "type": "array", "items": "string", "system": "labels" } }
        }
      }]
    }]
  })
}

/// Vote summary of the fixture issue
pub fn votes_json(has_voted: bool) -> Value {
  json!({
    "votes": u32::from(has_voted),
    "hasVoted": has_voted,
    "voters": []
  })
}

/// Watcher list of the fixture issue
pub fn watchers_json(is_watching: bool, names: &[&str]) -> Value {
  let watchers: Vec<Value> = names.iter().map(|name| user_json(name)).collect();
  json!({
    "isWatching": is_watching,
    "watchCount": names.len(),
    "watchers": watchers
  })
}

/// A Server/Data Center style user
pub fn user_json(name: &str) -> Value {
  json!({
    "name": name,
    "key": name,
    "displayName": format!("User {name}"),
    "emailAddress": format!("{name}@example.com"),
    "active": true
  })
}

/// `count` distinct users, as returned by user searches
pub fn users_json(count: usize) -> Value {
  Value::Array((0..count).map(|i| user_json(&format!("user{i}"))).collect())
}
