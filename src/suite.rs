//! The fixed sequence of checks run against the endpoint.

use log::{error, info};
use serde_json::Value;
use tokio::time::sleep;

use crate::client::TesterClient;
use crate::config::TesterConfig;
use crate::error::Result;
use crate::protocol::{self, CommandResponse};
use crate::report::{SuiteReport, TestResult};

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Connection,
    Heartbeat,
    Command { command: &'static str, expect: Expect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Success,
    Transcription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    pub name: &'static str,
    pub check: Check,
}

impl TestCase {
    const fn command(name: &'static str, command: &'static str, expect: Expect) -> Self {
        TestCase {
            name,
            check: Check::Command { command, expect },
        }
    }

    pub fn all() -> [TestCase; 8] {
        [
            TestCase {
                name: "Connection",
                check: Check::Connection,
            },
            TestCase {
                name: "Heartbeat",
                check: Check::Heartbeat,
            },
            TestCase::command("Play/Pause", "play_pause", Expect::Success),
            TestCase::command("Next Audio", "next", Expect::Success),
            TestCase::command("Previous Audio", "previous", Expect::Success),
            TestCase::command("Forward Audio", "forward", Expect::Success),
            TestCase::command("Backward Audio", "backward", Expect::Success),
            TestCase::command("Get Transcription", "get_transcription", Expect::Transcription),
        ]
    }

    /// Cases to run for the given `--only` filter. The connection check is
    /// always included.
    pub fn selected(only: &[String]) -> Vec<TestCase> {
        TestCase::all()
            .into_iter()
            .filter(|case| {
                only.is_empty()
                    || case.check == Check::Connection
                    || only.iter().any(|name| case.matches(name))
            })
            .collect()
    }

    /// Matches the display name or the command name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        if self.name.eq_ignore_ascii_case(name) {
            return true;
        }
        match self.check {
            Check::Connection => name.eq_ignore_ascii_case("connection"),
            Check::Heartbeat => name.eq_ignore_ascii_case("heartbeat"),
            Check::Command { command, .. } => command.eq_ignore_ascii_case(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub passed: bool,
    pub reason: Option<String>,
}

impl TestOutcome {
    pub fn pass() -> Self {
        TestOutcome {
            passed: true,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        TestOutcome {
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Connects, runs every selected case in order and returns the results.
/// A failed connection is reported through the connection check rather than
/// aborting the run.
pub async fn run_suite(config: &TesterConfig) -> SuiteReport {
    let rule = "=".repeat(50);
    info!("WebSocket Server Test Suite");
    info!("{rule}");
    info!("Testing WebSocket server at: {}", config.url);
    info!("Make sure your WebSocket server is running!");
    info!("{rule}");

    let mut client =
        match TesterClient::connect(&config.url, config.connect_timeout, config.poll_interval)
            .await
        {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Connection error: {e}");
                None
            }
        };

    let cases = TestCase::selected(&config.only);
    let mut results = Vec::with_capacity(cases.len());

    for (i, case) in cases.iter().enumerate() {
        let outcome = match run_case(client.as_mut(), case, config).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Test {} failed with exception: {e}", case.name);
                TestOutcome::fail(format!("exception: {e}"))
            }
        };
        results.push(TestResult {
            name: case.name,
            outcome,
        });

        if i + 1 < cases.len() {
            sleep(config.delay_between_tests).await;
        }
    }

    if let Some(client) = client {
        client.close().await;
    }

    SuiteReport::new(results)
}

pub async fn run_case(
    client: Option<&mut TesterClient>,
    case: &TestCase,
    config: &TesterConfig,
) -> Result<TestOutcome> {
    info!("");
    info!("=== Testing {} ===", case.name);

    let outcome = match case.check {
        Check::Connection => check_connection(client.as_deref()),
        Check::Heartbeat => check_heartbeat(client, config).await,
        Check::Command { command, expect } => {
            check_command(client, command, expect, config).await?
        }
    };

    match &outcome.reason {
        None => info!("✓ {} test passed", case.name),
        Some(reason) => error!("✗ {} test failed - {reason}", case.name),
    }
    Ok(outcome)
}

fn check_connection(client: Option<&TesterClient>) -> TestOutcome {
    match client {
        Some(client) if client.is_connected() => TestOutcome::pass(),
        _ => TestOutcome::fail("not connected"),
    }
}

async fn check_heartbeat(client: Option<&mut TesterClient>, config: &TesterConfig) -> TestOutcome {
    let Some(client) = client else {
        return not_connected("could not send");
    };
    if let Err(e) = client.send_heartbeat().await {
        error!("Error sending heartbeat: {e}");
        return TestOutcome::fail("could not send");
    }

    match client
        .wait_for(protocol::is_heartbeat_response, config.heartbeat_wait)
        .await
    {
        Some(_) => TestOutcome::pass(),
        None => TestOutcome::fail("no response received"),
    }
}

async fn check_command(
    client: Option<&mut TesterClient>,
    command: &str,
    expect: Expect,
    config: &TesterConfig,
) -> Result<TestOutcome> {
    let Some(client) = client else {
        return Ok(not_connected("could not send command"));
    };
    if let Err(e) = client.send_command(command, None).await {
        error!("Error sending command {command}: {e}");
        return Ok(TestOutcome::fail("could not send command"));
    }

    let Some(value) = client
        .wait_for_response(command, config.response_timeout)
        .await
    else {
        return Ok(TestOutcome::fail("no response received"));
    };

    evaluate_response(&value, expect)
}

/// Decides pass or fail for a reply that has already been correlated.
pub fn evaluate_response(value: &Value, expect: Expect) -> Result<TestOutcome> {
    let response = CommandResponse::from_value(value)?;
    if !response.success {
        return Ok(TestOutcome::fail(format!(
            "command failed: {}",
            response.error_message()
        )));
    }

    match expect {
        Expect::Success => {
            info!("  Response: {value}");
        }
        Expect::Transcription => {
            let transcription = response.transcription_text();
            if transcription.is_empty() {
                return Ok(TestOutcome::fail("empty transcription"));
            }
            let preview: String = transcription.chars().take(PREVIEW_CHARS).collect();
            info!(
                "  Transcription length: {} characters",
                transcription.chars().count()
            );
            info!("  Transcription preview: {preview}...");
        }
    }
    Ok(TestOutcome::pass())
}

fn not_connected(reason: &str) -> TestOutcome {
    error!("Not connected to WebSocket server");
    TestOutcome::fail(reason)
}
