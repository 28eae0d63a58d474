//! Command/response smoke tests for a WebSocket media-control endpoint.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod report;
pub mod suite;

pub use client::TesterClient;
pub use config::TesterConfig;
pub use error::{Result, TesterError};
pub use report::SuiteReport;
pub use suite::run_suite;
