//! Payload rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! (RouteClass, JSON payload)
//!     → payload.rs (truthiness, in-place field replacement)
//!     → transformer.rs (per-route guarded rewrites)
//!     → TransformOutcome::Rewritten(json) | Unchanged
//! ```
//!
//! # Design Decisions
//! - Keys are never added, removed or reordered; only present, truthy fields change
//! - Block flags are only ever cleared, never set
//! - Re-applying a rewrite is a no-op

pub mod payload;
pub mod transformer;

pub use transformer::{DataTransformer, TransformError, TransformOutcome};
