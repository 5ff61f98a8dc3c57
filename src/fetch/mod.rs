//! Network fetch boundary.
//!
//! # Data Flow
//! ```text
//! caller (url, RequestOptions)
//!     → client.rs (Fetch trait; HttpFetcher is the real network call)
//!     → envelope.rs (buffered ResponseEnvelope)
//!     → validator.rs (is it a 2xx JSON response? is the payload structured?)
//!     → builder.rs (new envelope from rewritten JSON + original metadata)
//! ```
//!
//! # Design Decisions
//! - Responses are fully buffered; catalog payloads are small JSON documents
//! - Envelopes are never mutated; rewriting produces a new one
//! - `content-length` is always dropped from rebuilt envelopes

pub mod builder;
pub mod client;
pub mod envelope;
pub mod validator;

pub use client::{Fetch, FetchError, HttpFetcher};
pub use envelope::{RequestOptions, ResponseEnvelope};
