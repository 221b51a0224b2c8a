//! Initialization logic and helpers for the logging of the deployer
//! binaries. Everything that decides where a log line ends up and what it
//! looks like lives here.
pub mod config;
pub mod tracing;

pub use config::Config;
