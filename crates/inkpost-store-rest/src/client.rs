//! REST data API client.
//!
//! Provides a sync HTTP client for a PostgREST-style table endpoint
//! (`{base_url}/rest/v1/{table}`) authenticated with an API key.

use std::time::Duration;

use inkpost_store::{Post, StoreError, StoreErrorKind};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default table name.
pub const DEFAULT_TABLE: &str = "posts";

/// Backend identifier for error messages.
pub(crate) const BACKEND: &str = "Rest";

/// Characters escaped in query values. PostgREST operators like `eq.` and
/// `date.desc` keep their dots.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Post store backed by a hosted REST data API.
pub struct RestStore {
    pub(crate) agent: Agent,
    endpoint: String,
    api_key: String,
}

impl RestStore {
    /// Create a store for the `posts` table with the default timeout.
    ///
    /// # Arguments
    /// * `base_url` - Project base URL, e.g. `https://project.supabase.co`
    /// * `api_key` - Publishable API key, sent as `apikey` and bearer token
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_options(base_url, api_key, DEFAULT_TABLE, DEFAULT_TIMEOUT)
    }

    /// Create a store for an arbitrary table with a custom request timeout.
    #[must_use]
    pub fn with_options(base_url: &str, api_key: &str, table: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            endpoint: format!("{}/rest/v1/{table}", base_url.trim_end_matches('/')),
            api_key: api_key.to_owned(),
        }
    }

    /// Table endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Endpoint URL with percent-encoded query parameters.
    pub(crate) fn url(&self, query: &[(&str, &str)]) -> String {
        let mut url = self.endpoint.clone();
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.extend(utf8_percent_encode(value, QUERY_VALUE));
        }
        url
    }

    /// Attach API key headers.
    pub(crate) fn authorized<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }
}

/// Map a transport-level failure to a store error.
pub(crate) fn transport_error(err: ureq::Error) -> StoreError {
    let (kind, retryable) = match err {
        ureq::Error::Timeout(_) => (StoreErrorKind::Timeout, true),
        ureq::Error::Io(_) | ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            (StoreErrorKind::Unavailable, true)
        }
        _ => (StoreErrorKind::Other, false),
    };
    let status = if retryable {
        inkpost_store::ErrorStatus::Temporary
    } else {
        inkpost_store::ErrorStatus::Permanent
    };
    StoreError::new(kind)
        .with_status(status)
        .with_backend(BACKEND)
        .with_source(err)
}

/// Read a response body, failing on non-2xx statuses.
pub(crate) fn read_success(response: Response<Body>) -> Result<String, StoreError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();
    let text = body.read_to_string().map_err(transport_error)?;

    if !(200..300).contains(&status) {
        tracing::warn!(status, "Data API request failed");
        return Err(StoreError::http_status(status, text).with_backend(BACKEND));
    }
    Ok(text)
}

/// Parse a row list. An empty body is an empty list.
pub(crate) fn parse_rows(text: &str) -> Result<Vec<Post>, StoreError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| StoreError::json(e).with_backend(BACKEND))
}
