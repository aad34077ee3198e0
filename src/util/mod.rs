//! Shared utilities

pub mod logging;

pub use logging::{init_from_config, init_from_env, init_logging, LoggingConfig};
