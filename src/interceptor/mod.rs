//! Interception orchestration.
//!
//! # State Machine (per call)
//! ```text
//! DISPATCH ──err──▶ propagate
//!    │
//! CLASSIFY ──NonTarget──▶ original response
//!    │
//! ROUTE_TO_PATH ──episode + unusable──▶ VIDEO_FALLBACK ──relay failed──▶ original
//!    │                                        │
//! REGULAR ──unusable──▶ original              │
//!    │ (empty episodes → relay substitution)  │
//!    ▼                                        ▼
//! TRANSFORM ──────────────▶ rebuilt response
//! ```
//!
//! Any failure after DISPATCH (errors and panics alike) returns the original
//! response.

pub mod error;
pub mod orchestrator;

pub use error::InterceptError;
pub use orchestrator::Interceptor;
