//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build interceptor → Bind gateway
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → trigger broadcast → gateway stops accepting → drains → exit
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_ctrl_c, Shutdown};
