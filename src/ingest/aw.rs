/// American Whitewater Data API Client
///
/// Retrieves raw reach detail documents from the AW river database for
/// normalization. One document per reach id; the payload shape varies by
/// snapshot and is handled downstream by the shape and range modules.
///
/// Detail endpoint: https://www.americanwhitewater.org/content/River/detail/id/{id}/.json

use serde_json::Value;

const AW_BASE_URL: &str = "https://www.americanwhitewater.org";

/// The upstream sits behind Cloudflare, which rejects default library
/// user agents; send a browser string.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Requests occasionally come back empty or rate-limited; retry up to this
/// many times before giving up on a reach.
const MAX_ATTEMPTS: u32 = 10;

// ============================================================================
// Error type
// ============================================================================

/// Errors that can arise when fetching a reach document from AW.
#[derive(Debug, PartialEq)]
pub enum AwFetchError {
    /// Non-2xx HTTP response from the AW API.
    HttpError(u16),
    /// The request itself failed (connection, TLS, timeout).
    RequestFailed(String),
    /// 200 with an empty body — how the upstream answers for a reach id
    /// that does not exist.
    EmptyBody,
    /// The response body could not be deserialized as JSON.
    ParseError(String),
    /// All attempts failed; carries the last error seen.
    RetriesExhausted { attempts: u32, last: String },
}

impl std::fmt::Display for AwFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwFetchError::HttpError(code) => write!(f, "HTTP error: {}", code),
            AwFetchError::RequestFailed(msg) => write!(f, "request failed: {}", msg),
            AwFetchError::EmptyBody => write!(f, "empty response body"),
            AwFetchError::ParseError(msg) => write!(f, "parse error: {}", msg),
            AwFetchError::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {} attempts, last error: {}", attempts, last)
            }
        }
    }
}

impl std::error::Error for AwFetchError {}

// ============================================================================
// API Client Functions
// ============================================================================

/// URL of the detail document for a reach.
pub fn reach_detail_url(reach_id: &str) -> String {
    format!("{}/content/River/detail/id/{}/.json", AW_BASE_URL, reach_id)
}

/// Builds a client with the browser user agent set. Callers reuse one
/// client across a whole refresh run.
pub fn build_client() -> Result<reqwest::blocking::Client, AwFetchError> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| AwFetchError::RequestFailed(e.to_string()))
}

/// Fetches the raw detail document for one reach, retrying transient
/// failures.
///
/// # Parameters
/// - `client`: HTTP client from `build_client`
/// - `reach_id`: numeric AW reach id (e.g. "3411")
///
/// # Returns
/// The raw JSON document, un-normalized.
pub fn fetch_reach_json(
    client: &reqwest::blocking::Client,
    reach_id: &str,
) -> Result<Value, AwFetchError> {
    let url = reach_detail_url(reach_id);

    let mut last = String::new();
    for _ in 0..MAX_ATTEMPTS {
        match fetch_once(client, &url) {
            Ok(doc) => return Ok(doc),
            Err(e) => last = e.to_string(),
        }
    }

    Err(AwFetchError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
        last,
    })
}

fn fetch_once(client: &reqwest::blocking::Client, url: &str) -> Result<Value, AwFetchError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| AwFetchError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AwFetchError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| AwFetchError::RequestFailed(e.to_string()))?;
    if body.trim().is_empty() {
        return Err(AwFetchError::EmptyBody);
    }

    serde_json::from_str(&body).map_err(|e| AwFetchError::ParseError(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
