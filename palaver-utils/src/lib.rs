//! palaver-utils: Common utilities for palaver
//!
//! Shared error type, logging setup, and filesystem path helpers used by
//! the other palaver crates.

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{PalaverError, Result};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogOutput};
