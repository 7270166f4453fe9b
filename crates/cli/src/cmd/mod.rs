//! CLI command implementations

pub mod config;
pub mod init;
pub mod report;
pub mod start;
pub mod trigger;
