//! Sentinel CLI library
//!
//! Configuration, logging setup and the monitoring runner behind the
//! `sentinel` binary, exposed for integration tests.

pub mod config;
pub mod daemon;
pub mod logging;
pub mod util;

pub use config::{Config, ConfigError};
pub use daemon::{drive, Runner};
