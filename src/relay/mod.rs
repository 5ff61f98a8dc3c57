//! Public relay fallback.
//!
//! # Data Flow
//! ```text
//! (url, RequestOptions)
//!     → relay URL: <endpoint><percent-encoded page origin + path>
//!     → forwarded headers: spoofed User-Agent, no content-length
//!     → real Fetch
//!     → RelayEnvelope { contents: "<origin body as text>" }
//!     → parsed origin JSON, or None
//! ```
//!
//! # Design Decisions
//! - Single attempt, no deadline, no retry
//! - Every failure collapses to `None` at this boundary

pub mod fallback;

pub use fallback::{ProxyFallback, RelayEnvelope, RelayError, RelaySettings, RelayedResponse};
