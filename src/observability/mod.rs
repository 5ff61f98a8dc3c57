//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline stages produce:
//!     → diagnostics.rs (structured DiagnosticEvent through an injected sink)
//!     → metrics.rs (counters per route and outcome)
//!
//! Consumers:
//!     → TracingDiagnostics → tracing subscriber (stdout)
//!     → MemoryDiagnostics  → assertions in tests
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The pipeline never logs directly; it reports events to a `Diagnostics`
//! - Metric updates are fire-and-forget and safe without an installed recorder

pub mod diagnostics;
pub mod metrics;

pub use diagnostics::{DiagnosticEvent, Diagnostics, Level, MemoryDiagnostics, TracingDiagnostics};
