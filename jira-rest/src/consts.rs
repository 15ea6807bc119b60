//! Constants for the jira-rest client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Path segments of the REST API root, relative to the instance base URL
pub const API_PATH: [&str; 3] = ["rest", "api", "2"];

/// Server-enforced ceiling on `maxResults` for paginated user searches
pub const MAX_RESULTS_CEILING: u32 = 1000;

/// Default page size when the caller does not ask for one
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header Jira requires on multipart uploads to bypass XSRF checks
pub const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// Value for [`ATLASSIAN_TOKEN_HEADER`]
pub const ATLASSIAN_TOKEN_NO_CHECK: &str = "no-check";
