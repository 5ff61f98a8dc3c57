//! Local HTTP gateway.
//!
//! # Data Flow
//! ```text
//! client request
//!     → server.rs (axum, request id, tracing)
//!     → headers.rs (strip hop-by-hop, host, encoding negotiation)
//!     → Interceptor (real fetch to the configured catalog origin + rewriting)
//!     → headers.rs (strip hop-by-hop from the envelope)
//!     → client response
//! ```
//!
//! # Design Decisions
//! - Every request goes to the single configured origin; no arbitrary targets
//! - Request bodies are buffered up to a configured limit
//! - A failed upstream call answers 502; rewriting failures never surface

pub mod headers;
pub mod server;

pub use server::Gateway;
