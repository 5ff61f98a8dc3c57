//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request identifier (absolute or origin-relative)
//!     → classifier.rs (resolve against page origin, take path)
//!     → matcher.rs (evaluate ordered path rules)
//!     → Return: RouteClass (NonTarget when nothing matches)
//! ```
//!
//! # Design Decisions
//! - Rules compiled at construction, immutable afterwards
//! - No regex in hot path (prefix and segment matching only)
//! - First match wins; specific release routes precede the generic prefix
//! - Resolution failures degrade to NonTarget, never to an error

pub mod classifier;
pub mod matcher;

pub use classifier::{RouteClass, RouteClassifier};
