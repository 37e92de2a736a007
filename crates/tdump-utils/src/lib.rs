//! # tdump Utilities
//!
//! Shared utilities, logging, and config helpers for tdump.
//!
//! The core crate only emits `tracing` events. This crate owns subscriber
//! setup so that benchmark drivers, comparison tools, and tests configure
//! output the same way.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, init_test_logging, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
