//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use catalog_interceptor::fetch::{Fetch, FetchError, RequestOptions, ResponseEnvelope};
use catalog_interceptor::observability::MemoryDiagnostics;
use catalog_interceptor::relay::RelaySettings;
use catalog_interceptor::Interceptor;
use futures_util::future::BoxFuture;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;
use url::Url;

pub const ORIGIN: &str = "https://catalog.example";
pub const RELAY: &str = "https://relay.example/get?url=";
pub const EPISODE: &str = "/api/v1/anime/releases/episodes/9f1c2a4e-1b2c-4d3e-8f90-0a1b2c3d4e5f";

type Handler = dyn Fn(&str, &RequestOptions) -> Result<ResponseEnvelope, FetchError> + Send + Sync;

/// A fetch whose answers come from a closure; every call is recorded.
pub struct ScriptedFetch {
    handler: Box<Handler>,
    calls: Mutex<Vec<(String, RequestOptions)>>,
}

impl ScriptedFetch {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&str, &RequestOptions) -> Result<ResponseEnvelope, FetchError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, RequestOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn relay_calls(&self) -> Vec<(String, RequestOptions)> {
        self.calls()
            .into_iter()
            .filter(|(url, _)| url.starts_with(RELAY))
            .collect()
    }
}

impl Fetch for ScriptedFetch {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, FetchError>> {
        let result = (self.handler)(url, &options);
        self.calls.lock().unwrap().push((url.to_string(), options));
        Box::pin(async move { result })
    }
}

pub fn is_relay(url: &str) -> bool {
    url.starts_with(RELAY)
}

/// A response with the given status, content type and raw body.
pub fn raw_response(status: u16, content_type: &'static str, body: &str) -> ResponseEnvelope {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    headers.insert("x-origin", HeaderValue::from_static("catalog"));
    let status = StatusCode::from_u16(status).unwrap();
    ResponseEnvelope::new(status, status.canonical_reason().unwrap_or(""), headers, body.to_string())
}

pub fn json_response(status: u16, body: &Value) -> ResponseEnvelope {
    raw_response(status, "application/json", &body.to_string())
}

/// What the relay answers when it has the origin body.
pub fn relay_response(contents: &Value) -> ResponseEnvelope {
    let envelope = serde_json::json!({
        "contents": contents.to_string(),
        "status": {"http_code": 200}
    });
    let body = envelope.to_string();
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    headers.insert("x-relay", HeaderValue::from_static("allorigins"));
    ResponseEnvelope::new(StatusCode::OK, "OK", headers, body)
}

pub fn interceptor(fetch: Arc<ScriptedFetch>) -> (Interceptor, Arc<MemoryDiagnostics>) {
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let interceptor = Interceptor::new(
        fetch,
        Url::parse(ORIGIN).unwrap(),
        RelaySettings {
            endpoint: RELAY.to_string(),
            user_agent: HeaderValue::from_static("spoofed-agent"),
        },
        diagnostics.clone(),
    );
    (interceptor, diagnostics)
}
