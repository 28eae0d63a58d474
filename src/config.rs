use std::time::Duration;

use url::Url;

use crate::error::{Result, TesterError};
use crate::suite::TestCase;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for one run of the suite.
#[derive(Debug, Clone)]
pub struct TesterConfig {
    pub url: String,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
    pub heartbeat_wait: Duration,
    pub delay_between_tests: Duration,
    pub poll_interval: Duration,
    pub only: Vec<String>,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            url: ws_url(DEFAULT_HOST, DEFAULT_PORT),
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(3),
            heartbeat_wait: Duration::from_secs(1),
            delay_between_tests: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
            only: Vec::new(),
        }
    }
}

impl TesterConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Checks the URL scheme and that every `only` entry names a known check.
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.url)?;
        match parsed.scheme() {
            "ws" | "wss" => {}
            other => return Err(TesterError::InvalidScheme(other.to_string())),
        }

        let cases = TestCase::all();
        for name in &self.only {
            if !cases.iter().any(|case| case.matches(name)) {
                return Err(TesterError::UnknownCheck(name.clone()));
            }
        }
        Ok(())
    }
}

pub fn ws_url(host: &str, port: u16) -> String {
    format!("ws://{host}:{port}")
}
