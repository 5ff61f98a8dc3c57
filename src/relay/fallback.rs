//! Relay fallback for empty or unusable catalog lookups.

use std::sync::Arc;

use http::header::{CONTENT_LENGTH, USER_AGENT};
use http::{HeaderValue, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::constants::{RELAY_ENDPOINT, SPOOFED_USER_AGENT};
use crate::fetch::builder::rebuild;
use crate::fetch::validator::is_usable_response;
use crate::fetch::{Fetch, FetchError, RequestOptions, ResponseEnvelope};
use crate::observability::metrics;
use crate::observability::{DiagnosticEvent, Diagnostics};
use crate::transform::payload::{is_set, EpisodeListing};

/// Wire format of the relay: the origin body serialized as a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayEnvelope {
    #[serde(default)]
    pub contents: Option<String>,
}

/// Why a relay attempt produced nothing.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("cannot build relay target for '{url}': {source}")]
    Target {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("relay answered with status {0}")]
    Status(StatusCode),

    #[error("relay response is not usable JSON (status {0})")]
    Unusable(StatusCode),

    #[error("relay envelope is malformed: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("relay found nothing")]
    Empty,

    #[error("relayed contents are not JSON: {0}")]
    Contents(#[source] serde_json::Error),
}

/// Relay result used in place of an unusable origin response.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub response: ResponseEnvelope,
    pub data: Value,
}

/// Where the relay lives and how requests to it identify themselves.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Prefix the percent-encoded target URL is appended to.
    pub endpoint: String,
    pub user_agent: HeaderValue,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            endpoint: RELAY_ENDPOINT.to_string(),
            user_agent: HeaderValue::from_static(SPOOFED_USER_AGENT),
        }
    }
}

/// Re-issues catalog requests through the public relay.
#[derive(Clone)]
pub struct ProxyFallback {
    fetcher: Arc<dyn Fetch>,
    origin: Url,
    settings: RelaySettings,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ProxyFallback {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        origin: Url,
        settings: RelaySettings,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            fetcher,
            origin,
            settings,
            diagnostics,
        }
    }

    /// The origin promised episodes but delivered an empty list.
    pub fn needs_fallback(data: &Value) -> bool {
        // A derived record would also fill itself from an array, by position.
        if !data.is_object() {
            return false;
        }
        let Ok(listing) = EpisodeListing::deserialize(data) else {
            return false;
        };
        is_set(&listing.episodes_total)
            && matches!(&listing.episodes, Some(Value::Array(items)) if items.is_empty())
    }

    /// Relay URL for a catalog identifier: endpoint + page origin + path.
    pub fn relay_url(&self, url: &str) -> Result<String, RelayError> {
        let resolved = self.origin.join(url).map_err(|source| RelayError::Target {
            url: url.to_string(),
            source,
        })?;

        let mut target = self.origin.origin().ascii_serialization();
        target.push_str(resolved.path());
        if let Some(query) = resolved.query() {
            target.push('?');
            target.push_str(query);
        }

        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        Ok(format!("{}{}", self.settings.endpoint, encoded))
    }

    /// Forwarded options: same method and body, spoofed agent, no length.
    pub fn relay_options(&self, options: &RequestOptions) -> RequestOptions {
        let mut relayed = options.clone();
        relayed.headers.insert(USER_AGENT, self.settings.user_agent.clone());
        relayed.headers.remove(CONTENT_LENGTH);
        relayed
    }

    /// Issue the relay call and return its raw response.
    pub async fn fetch_response(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope, RelayError> {
        let relay_url = self.relay_url(url)?;
        let response = self
            .fetcher
            .fetch(&relay_url, self.relay_options(options))
            .await?;
        Ok(response)
    }

    /// Fetch origin data through the relay; `None` on any failure.
    pub async fn fetch(&self, url: &str, options: &RequestOptions) -> Option<Value> {
        self.diagnostics.info(DiagnosticEvent::RelayStarted { url: url.to_string() });

        let result: Result<Value, RelayError> = async {
            let response = self.fetch_response(url, options).await?;
            if !response.status().is_success() {
                return Err(RelayError::Status(response.status()));
            }
            unwrap_envelope(&response)
        }
        .await;

        self.finish(url, result)
    }

    /// Replace an unusable origin response with the relay's, status and
    /// headers included; `None` on any failure.
    pub async fn fetch_via_relay(&self, url: &str, options: &RequestOptions) -> Option<RelayedResponse> {
        self.diagnostics.info(DiagnosticEvent::VideoRelayStarted { url: url.to_string() });

        let result: Result<RelayedResponse, RelayError> = async {
            let response = self.fetch_response(url, options).await?;
            if !is_usable_response(&response) {
                return Err(RelayError::Unusable(response.status()));
            }
            let data = unwrap_envelope(&response)?;
            let response = rebuild(&response, &data).map_err(RelayError::Contents)?;
            Ok(RelayedResponse { response, data })
        }
        .await;

        self.finish(url, result)
    }

    fn finish<T>(&self, url: &str, result: Result<T, RelayError>) -> Option<T> {
        metrics::record_relay(result.is_ok());
        match result {
            Ok(value) => {
                self.diagnostics.info(DiagnosticEvent::RelayFinished { url: url.to_string() });
                Some(value)
            }
            Err(e) => {
                self.diagnostics.warning(DiagnosticEvent::RelayFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }
}

/// Parse the relay envelope and the origin body it carries.
pub fn unwrap_envelope(response: &ResponseEnvelope) -> Result<Value, RelayError> {
    let envelope: RelayEnvelope =
        serde_json::from_slice(response.body()).map_err(RelayError::Envelope)?;

    let contents = match envelope.contents {
        Some(text) if !text.is_empty() => text,
        _ => return Err(RelayError::Empty),
    };

    match serde_json::from_str::<Value>(&contents).map_err(RelayError::Contents)? {
        Value::Null => Err(RelayError::Empty),
        data => Ok(data),
    }
}
