//! Utility modules for binderpack

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
