//! HTTP transport for the search service.
//!
//! Wraps `reqwest::blocking` with a uniform error contract:
//!
//! - every request carries `Content-Type: application/json`; configured
//!   headers (e.g. an API token) are merged on top and win on conflict
//! - a non-2xx response is reduced to a single human-readable message,
//!   extracted from a JSON `detail` or `message` field, falling back to the
//!   raw body text, falling back to `"Request failed with status {n}"`
//! - a raw parse failure never escapes to the caller

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use super::{ApiError, CancelToken, SearchBackend};
use crate::config::ClientConfig;
use crate::model::types::SearchRequest;

pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}"))
        {
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("vsq/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// Issue a request and apply the error contract to the response.
    fn request_json(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        cancel: &CancelToken,
    ) -> Result<serde_json::Value, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Aborted);
        }

        let url = self.url(path);
        debug!(url = %url, method = if body.is_some() { "POST" } else { "GET" }, "request_start");

        let builder = match body {
            Some(payload) => self.client.post(&url).json(payload),
            None => self.client.get(&url),
        };

        let response = builder.send().map_err(|e| {
            if cancel.is_cancelled() {
                ApiError::Aborted
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        // A token cancelled while the call was in flight suppresses the
        // outcome even though the transfer completed.
        if cancel.is_cancelled() {
            return Err(ApiError::Aborted);
        }

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body_text),
            });
        }

        response
            .json::<serde_json::Value>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Extract a human-readable message from an error response body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let detail = value
            .get("detail")
            .or_else(|| value.get("message"))
            .and_then(|d| d.as_str());
        if let Some(msg) = detail
            && !msg.trim().is_empty()
        {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    format!("Request failed with status {status}")
}

impl SearchBackend for HttpBackend {
    fn search(
        &self,
        req: &SearchRequest,
        cancel: &CancelToken,
    ) -> Result<serde_json::Value, ApiError> {
        let body = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request_json("/search", Some(&body), cancel)
    }

    fn list_posts(&self, cancel: &CancelToken) -> Result<serde_json::Value, ApiError> {
        self.request_json("/posts", None, cancel)
    }

    fn health(&self) -> Result<(), ApiError> {
        let value = self.request_json("/health", None, &CancelToken::new())?;
        match value.get("status").and_then(|s| s.as_str()) {
            Some("ok") => Ok(()),
            other => Err(ApiError::Decode(format!(
                "unexpected health status: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail_field() {
        assert_eq!(
            error_message(503, r#"{"detail":"index not ready"}"#),
            "index not ready"
        );
        assert_eq!(
            error_message(500, r#"{"message":"boom"}"#),
            "boom"
        );
    }

    #[test]
    fn error_message_falls_back_to_body_then_status() {
        assert_eq!(error_message(502, "bad gateway"), "bad gateway");
        // JSON without the known fields falls through to the raw text.
        assert_eq!(error_message(500, r#"{"oops":1}"#), r#"{"oops":1}"#);
        assert_eq!(error_message(404, "   "), "Request failed with status 404");
        assert_eq!(
            error_message(418, r#"{"detail":""}"#),
            r#"{"detail":""}"#
        );
    }
}
