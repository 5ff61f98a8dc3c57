//! Catalog API response interceptor library.
//!
//! Wraps the real network fetch, rewrites block flags and location data in
//! catalog responses, and retries empty episode lookups through a public relay.

pub mod config;
pub mod constants;
pub mod fetch;
pub mod gateway;
pub mod interceptor;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod routing;
pub mod transform;

pub use config::schema::InterceptorConfig;
pub use fetch::{Fetch, FetchError, HttpFetcher, RequestOptions, ResponseEnvelope};
pub use interceptor::Interceptor;
pub use lifecycle::Shutdown;
