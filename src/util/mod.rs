//! Utility modules

pub mod logging;

pub use logging::{init_logging, init_with_level, parse_level, LoggingConfig};
