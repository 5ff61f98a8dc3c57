//! Structured diagnostics sink.
//!
//! # Responsibilities
//! - Define the events the interception pipeline reports
//! - Forward events to `tracing` in production
//! - Record events in memory for tests
//!
//! # Design Decisions
//! - Events are values, not formatted strings, so callers can match on them
//! - Three severities only: info, warning, error

use std::fmt;
use std::sync::Mutex;

use crate::routing::RouteClass;

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Something the pipeline wants an operator to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A catalog call was recognised and is being rewritten.
    Intercepting { url: String, route: RouteClass },
    /// The rebuilt response was handed back to the caller.
    Rewritten { url: String, route: RouteClass },
    /// The URL could not be resolved against the page origin.
    ClassificationFailed { url: String, reason: String },
    /// Non-2xx or non-JSON response; rewriting skipped.
    UnusableResponse { url: String, status: u16 },
    /// Payload was not a JSON object or array.
    InvalidData { route: RouteClass },
    /// Origin promised episodes but delivered none; asking the relay.
    RelayStarted { url: String },
    RelayFinished { url: String },
    RelayFailed { url: String, reason: String },
    /// Origin episode lookup was unusable; replacing it with the relay's.
    VideoRelayStarted { url: String },
    /// Something inside the rewriting steps failed; original returned.
    RewriteFailed { url: String, reason: String },
    /// The real network call itself failed; error propagated.
    DispatchFailed { url: String, reason: String },
}

impl DiagnosticEvent {
    /// Short machine-readable name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Intercepting { .. } => "intercepting",
            Self::Rewritten { .. } => "rewritten",
            Self::ClassificationFailed { .. } => "classification_failed",
            Self::UnusableResponse { .. } => "unusable_response",
            Self::InvalidData { .. } => "invalid_data",
            Self::RelayStarted { .. } => "relay_started",
            Self::RelayFinished { .. } => "relay_finished",
            Self::RelayFailed { .. } => "relay_failed",
            Self::VideoRelayStarted { .. } => "video_relay_started",
            Self::RewriteFailed { .. } => "rewrite_failed",
            Self::DispatchFailed { .. } => "dispatch_failed",
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intercepting { url, route } => write!(f, "rewriting {} response for {}", route, url),
            Self::Rewritten { url, route } => write!(f, "{} response rewritten for {}", route, url),
            Self::ClassificationFailed { url, reason } => {
                write!(f, "could not classify {}: {}", url, reason)
            }
            Self::UnusableResponse { url, status } => {
                write!(f, "unusable response from {} (status {})", url, status)
            }
            Self::InvalidData { route } => write!(f, "invalid {} payload, left unchanged", route),
            Self::RelayStarted { url } => write!(f, "empty episode list for {}, asking relay", url),
            Self::RelayFinished { url } => write!(f, "relay answered for {}", url),
            Self::RelayFailed { url, reason } => write!(f, "relay failed for {}: {}", url, reason),
            Self::VideoRelayStarted { url } => write!(f, "relaying unusable episode lookup {}", url),
            Self::RewriteFailed { url, reason } => {
                write!(f, "rewrite failed for {}, returning original: {}", url, reason)
            }
            Self::DispatchFailed { url, reason } => write!(f, "request to {} failed: {}", url, reason),
        }
    }
}

/// Sink for pipeline diagnostics.
pub trait Diagnostics: Send + Sync {
    fn info(&self, event: DiagnosticEvent);
    fn warning(&self, event: DiagnosticEvent);
    fn error(&self, event: DiagnosticEvent);
}

/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, event: DiagnosticEvent) {
        tracing::info!(target: "catalog_interceptor", kind = event.kind(), "{}", event);
    }

    fn warning(&self, event: DiagnosticEvent) {
        tracing::warn!(target: "catalog_interceptor", kind = event.kind(), "{}", event);
    }

    fn error(&self, event: DiagnosticEvent) {
        tracing::error!(target: "catalog_interceptor", kind = event.kind(), "{}", event);
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<(Level, DiagnosticEvent)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<(Level, DiagnosticEvent)> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Kinds recorded at the given level, in order.
    pub fn kinds_at(&self, level: Level) -> Vec<&'static str> {
        self.events()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, e)| e.kind())
            .collect()
    }

    /// True if an event of this kind was recorded at any level.
    pub fn saw(&self, kind: &str) -> bool {
        self.events().iter().any(|(_, e)| e.kind() == kind)
    }

    fn push(&self, level: Level, event: DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, event));
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn info(&self, event: DiagnosticEvent) {
        self.push(Level::Info, event);
    }

    fn warning(&self, event: DiagnosticEvent) {
        self.push(Level::Warning, event);
    }

    fn error(&self, event: DiagnosticEvent) {
        self.push(Level::Error, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_diagnostics_records_levels_in_order() {
        let sink = MemoryDiagnostics::new();
        sink.info(DiagnosticEvent::RelayStarted { url: "/a".into() });
        sink.warning(DiagnosticEvent::InvalidData { route: RouteClass::ReleaseOther });
        sink.error(DiagnosticEvent::RewriteFailed { url: "/a".into(), reason: "boom".into() });

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].0, Level::Info);
        assert_eq!(sink.kinds_at(Level::Warning), vec!["invalid_data"]);
        assert_eq!(sink.kinds_at(Level::Error), vec!["rewrite_failed"]);
        assert!(sink.saw("relay_started"));
        assert!(!sink.saw("dispatch_failed"));
    }

    #[test]
    fn test_event_display_mentions_url() {
        let event = DiagnosticEvent::UnusableResponse { url: "/api/x".into(), status: 503 };
        let text = event.to_string();
        assert!(text.contains("/api/x"));
        assert!(text.contains("503"));
    }
}
