//! Logging setup.
//!
//! Everything logs through the `log` facade; this module installs
//! `env_logger` as the backend.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
