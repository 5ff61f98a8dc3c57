//! The interceptor: a drop-in `Fetch` wrapping the real network call.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use http::HeaderValue;
use serde_json::Value;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::InterceptorConfig;
use crate::fetch::builder::rebuild;
use crate::fetch::validator::is_usable_response;
use crate::fetch::{Fetch, FetchError, RequestOptions, ResponseEnvelope};
use crate::interceptor::InterceptError;
use crate::observability::metrics::{self, Outcome};
use crate::observability::{DiagnosticEvent, Diagnostics};
use crate::relay::{ProxyFallback, RelaySettings};
use crate::routing::{RouteClass, RouteClassifier};
use crate::transform::{DataTransformer, TransformOutcome};

/// Where a call ends after the rewriting steps.
enum Flow {
    /// Hand back the real response untouched.
    Original(Outcome),
    Rewritten(ResponseEnvelope),
}

/// Data headed for TRANSFORM, with the envelope whose metadata it will wear.
struct Candidate {
    base: ResponseEnvelope,
    data: Value,
    /// Data came from the relay rather than from `base`'s own body.
    substituted: bool,
}

/// Wraps the real fetch and rewrites catalog responses.
///
/// Stateless per call; share it behind an `Arc` across tasks.
pub struct Interceptor {
    fetcher: Arc<dyn Fetch>,
    classifier: RouteClassifier,
    transformer: DataTransformer,
    fallback: ProxyFallback,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Interceptor {
    /// Create an interceptor around `fetcher`, the real network function.
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        origin: Url,
        relay: RelaySettings,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            classifier: RouteClassifier::new(origin.clone(), diagnostics.clone()),
            transformer: DataTransformer::new(diagnostics.clone()),
            fallback: ProxyFallback::new(fetcher.clone(), origin, relay, diagnostics.clone()),
            fetcher,
            diagnostics,
        }
    }

    /// Create an interceptor from loaded configuration.
    pub fn from_config(
        fetcher: Arc<dyn Fetch>,
        config: &InterceptorConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, ConfigError> {
        let origin = config.origin.url()?;
        let user_agent = HeaderValue::from_str(&config.relay.user_agent)
            .map_err(|e| ConfigError::Value(format!("relay.user_agent: {}", e)))?;
        let relay = RelaySettings {
            endpoint: config.relay.endpoint.clone(),
            user_agent,
        };
        Ok(Self::new(fetcher, origin, relay, diagnostics))
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    /// Issue `url` through the real fetch and rewrite the result if it is a
    /// catalog response. Only a failure of the real fetch itself is returned
    /// as an error.
    pub async fn intercept(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<ResponseEnvelope, FetchError> {
        let response = match self.fetcher.fetch(url, options.clone()).await {
            Ok(response) => response,
            Err(e) => {
                self.diagnostics.error(DiagnosticEvent::DispatchFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let route = self.classifier.classify(url);
        if !route.is_target() {
            return Ok(response);
        }

        metrics::record_call(route);
        self.diagnostics.info(DiagnosticEvent::Intercepting {
            url: url.to_string(),
            route,
        });

        let flow = AssertUnwindSafe(self.handle_response(route, url, &options, &response))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(InterceptError::Panicked(panic_message(panic))));

        match flow {
            Ok(Flow::Rewritten(rewritten)) => {
                metrics::record_outcome(route, Outcome::Rewritten);
                self.diagnostics.info(DiagnosticEvent::Rewritten {
                    url: url.to_string(),
                    route,
                });
                Ok(rewritten)
            }
            Ok(Flow::Original(outcome)) => {
                metrics::record_outcome(route, outcome);
                Ok(response)
            }
            Err(e) => {
                metrics::record_outcome(route, Outcome::FailOpen);
                self.diagnostics.error(DiagnosticEvent::RewriteFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                Ok(response)
            }
        }
    }

    async fn handle_response(
        &self,
        route: RouteClass,
        url: &str,
        options: &RequestOptions,
        response: &ResponseEnvelope,
    ) -> Result<Flow, InterceptError> {
        if route == RouteClass::VideoEpisode && !is_usable_response(response) {
            return match self.video_fallback(url, options).await {
                Some(candidate) => self.transform(route, candidate),
                None => Ok(Flow::Original(Outcome::FailOpen)),
            };
        }

        match self.regular(url, options, response).await? {
            Some(candidate) => self.transform(route, candidate),
            None => Ok(Flow::Original(Outcome::Passthrough)),
        }
    }

    async fn regular(
        &self,
        url: &str,
        options: &RequestOptions,
        response: &ResponseEnvelope,
    ) -> Result<Option<Candidate>, InterceptError> {
        if !is_usable_response(response) {
            self.diagnostics.warning(DiagnosticEvent::UnusableResponse {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
            return Ok(None);
        }

        let data = response.json().map_err(InterceptError::Parse)?;

        if ProxyFallback::needs_fallback(&data) {
            if let Some(relayed) = self.fallback.fetch(url, options).await {
                return Ok(Some(Candidate {
                    base: response.clone(),
                    data: relayed,
                    substituted: true,
                }));
            }
        }

        Ok(Some(Candidate {
            base: response.clone(),
            data,
            substituted: false,
        }))
    }

    async fn video_fallback(&self, url: &str, options: &RequestOptions) -> Option<Candidate> {
        let relayed = self.fallback.fetch_via_relay(url, options).await?;
        Some(Candidate {
            base: relayed.response,
            data: relayed.data,
            substituted: true,
        })
    }

    fn transform(&self, route: RouteClass, candidate: Candidate) -> Result<Flow, InterceptError> {
        let Candidate {
            base,
            data,
            substituted,
        } = candidate;
        let kept = substituted.then(|| data.clone());

        let payload = match self.transformer.transform(route, data)? {
            TransformOutcome::Rewritten(rewritten) => rewritten,
            TransformOutcome::Unchanged => match kept {
                Some(relayed) => relayed,
                None => return Ok(Flow::Original(Outcome::Passthrough)),
            },
        };

        let rebuilt = rebuild(&base, &payload).map_err(InterceptError::Rebuild)?;
        Ok(Flow::Rewritten(rebuilt))
    }
}

impl Fetch for Interceptor {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        options: RequestOptions,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, FetchError>> {
        Box::pin(self.intercept(url, options))
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
