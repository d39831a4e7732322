//! # Observability
//!
//! Structured logging for trust resolution and config builds.

pub mod logging;

pub use logging::init_logging;
