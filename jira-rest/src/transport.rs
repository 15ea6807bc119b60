//! # Transport
//!
//! The single capability the client needs from the outside world: perform one
//! HTTP exchange against a URL and hand back the status and body. Mapping
//! statuses onto [`JiraError`] happens in the client, so every transport
//! only reports failures below the application layer.

use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode, header};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::consts::USER_AGENT;
use crate::error::{JiraError, Result};
use crate::models::JiraAuth;

/// Payload of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
  #[default]
  Empty,
  Json(Value),
  /// A single file sent as multipart form data under the `file` part name
  File { filename: String, bytes: Vec<u8> },
}

/// One request against a resource URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  pub url: Url,
  pub query: Vec<(String, String)>,
  pub headers: Vec<(String, String)>,
  pub body: RequestBody,
}

impl ApiRequest {
  pub fn new(method: Method, url: Url) -> Self {
    Self {
      method,
      url,
      query: Vec::new(),
      headers: Vec::new(),
      body: RequestBody::Empty,
    }
  }

  pub fn get(url: Url) -> Self {
    Self::new(Method::GET, url)
  }

  pub fn post(url: Url) -> Self {
    Self::new(Method::POST, url)
  }

  pub fn put(url: Url) -> Self {
    Self::new(Method::PUT, url)
  }

  pub fn delete(url: Url) -> Self {
    Self::new(Method::DELETE, url)
  }

  pub fn query(mut self, key: &str, value: impl ToString) -> Self {
    self.query.push((key.to_string(), value.to_string()));
    self
  }

  pub fn header(mut self, name: &str, value: &str) -> Self {
    self.headers.push((name.to_string(), value.to_string()));
    self
  }

  pub fn json(mut self, body: Value) -> Self {
    self.body = RequestBody::Json(body);
    self
  }

  pub fn file(mut self, filename: &str, bytes: Vec<u8>) -> Self {
    self.body = RequestBody::File {
      filename: filename.to_string(),
      bytes,
    };
    self
  }
}

/// Raw outcome of an exchange that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: StatusCode,
  pub body: String,
}

/// Executes request/response exchanges.
///
/// Implementations return `Err` only when no HTTP response was obtained;
/// any response, including 4xx and 5xx, is returned as `Ok`.
pub trait Transport: Send + Sync {
  fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// [`Transport`] backed by `reqwest` with HTTP basic authentication.
#[derive(Clone)]
pub struct HttpTransport {
  pub(crate) client: Client,
  pub(crate) auth: JiraAuth,
}

impl HttpTransport {
  /// Build a transport with the given per-request timeout.
  pub fn new(auth: JiraAuth, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| JiraError::transport_with("Failed to build HTTP client", e))?;

    Ok(Self { client, auth })
  }
}

impl Transport for HttpTransport {
  async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
    trace!("{} {}", request.method, request.url);

    let mut builder = self
      .client
      .request(request.method.clone(), request.url.clone())
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .header(header::ACCEPT, "application/json");

    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }
    for (name, value) in &request.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }

    builder = match request.body {
      RequestBody::Empty => builder,
      RequestBody::Json(body) => builder.json(&body),
      RequestBody::File { filename, bytes } => {
        let part = Part::bytes(bytes).file_name(filename);
        builder.multipart(Form::new().part("file", part))
      }
    };

    let response = builder.send().await?;
    let status = response.status();
    debug!("Jira API response status: {}", status);

    let body = response.text().await?;
    trace!("Jira API response body: {}", body);

    Ok(ApiResponse { status, body })
  }
}
