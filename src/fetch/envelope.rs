//! Request options and buffered response envelope.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

/// Options accompanying a fetch, mirroring what a page passes to its fetch.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// A fully buffered HTTP response.
///
/// Immutable once built; rewriting produces a new envelope.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    url: String,
    status: StatusCode,
    status_text: String,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseEnvelope {
    pub fn new(
        status: StatusCode,
        status_text: impl Into<String>,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            url: String::new(),
            status,
            status_text: status_text.into(),
            headers,
            body: body.into(),
        }
    }

    /// Attach the URL the response was fetched from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Final URL of the response, empty when unknown.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase as received (may be empty).
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Header value as text, if present and valid visible ASCII.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use http::HeaderValue;

    #[test]
    fn test_json_and_header_access() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let envelope = ResponseEnvelope::new(StatusCode::OK, "OK", headers, r#"{"a":1}"#)
            .with_url("https://catalog.example/x");

        assert_eq!(envelope.header_str("Content-Type"), Some("application/json"));
        assert_eq!(envelope.json().unwrap()["a"], 1);
        assert_eq!(envelope.url(), "https://catalog.example/x");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let envelope = ResponseEnvelope::new(StatusCode::OK, "OK", HeaderMap::new(), "<html>");
        assert!(envelope.json().is_err());
    }
}
