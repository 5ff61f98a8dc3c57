//! The fetch capability and its real network implementation.
//!
//! # Responsibilities
//! - Define the `Fetch` seam every pipeline stage calls through
//! - Resolve origin-relative identifiers like a page would
//! - Issue the request with reqwest and buffer the response
//!
//! # Design Decisions
//! - No request timeout: a hung call hangs the caller, who may drop the future
//! - Boxed futures keep the trait object-safe

use futures_util::future::BoxFuture;
use thiserror::Error;
use url::Url;

use crate::fetch::{RequestOptions, ResponseEnvelope};

/// Errors raised by a network fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The identifier could not be turned into an absolute URL.
    #[error("invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, protocol or body transfer failure.
    #[error("network error: {0}")]
    Network(String),

    /// Client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(String),
}

/// A drop-in network fetch: resource identifier plus options in, response out.
pub trait Fetch: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, FetchError>>;
}

/// The real network function, backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: Url,
}

impl HttpFetcher {
    /// Create a fetcher resolving relative identifiers against `origin`.
    pub fn new(origin: Url) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, FetchError>> {
        Box::pin(async move {
            let target = self.origin.join(url).map_err(|source| FetchError::InvalidUrl {
                url: url.to_string(),
                source,
            })?;

            tracing::debug!(method = %options.method, url = %target, "Fetching");

            let mut request = self
                .client
                .request(options.method, target)
                .headers(options.headers);
            if let Some(body) = options.body {
                request = request.body(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            let final_url = response.url().to_string();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            Ok(ResponseEnvelope::new(
                status,
                status.canonical_reason().unwrap_or_default(),
                headers,
                body,
            )
            .with_url(final_url))
        })
    }
}
