mod common;

use std::time::Duration;

use common::{StubMode, spawn_stub, unreachable_url};
use ws_command_tester::{SuiteReport, TesterConfig, run_suite};

fn fast_config(url: String) -> TesterConfig {
    TesterConfig {
        response_timeout: Duration::from_millis(500),
        heartbeat_wait: Duration::from_millis(500),
        delay_between_tests: Duration::ZERO,
        poll_interval: Duration::from_millis(10),
        ..TesterConfig::with_url(url)
    }
}

fn failed(report: &SuiteReport) -> Vec<&'static str> {
    report
        .results()
        .iter()
        .filter(|r| !r.outcome.passed)
        .map(|r| r.name)
        .collect()
}

#[tokio::test]
async fn healthy_server_passes_every_check() {
    let url = spawn_stub(StubMode::Healthy).await;
    let report = run_suite(&fast_config(url)).await;

    assert_eq!(report.total(), 8);
    assert!(report.all_passed(), "failed: {:?}", failed(&report));
}

#[tokio::test]
async fn failing_commands_surface_server_error() {
    let url = spawn_stub(StubMode::FailCommands).await;
    let report = run_suite(&fast_config(url)).await;

    assert_eq!(report.passed(), 2);
    let play_pause = &report.results()[2];
    assert_eq!(play_pause.name, "Play/Pause");
    assert_eq!(
        play_pause.outcome.reason.as_deref(),
        Some("command failed: player unavailable")
    );
}

#[tokio::test]
async fn silent_server_times_out() {
    let url = spawn_stub(StubMode::Silent).await;
    let report = run_suite(&fast_config(url)).await;

    assert_eq!(report.passed(), 1);
    assert!(
        report.results()[1..]
            .iter()
            .all(|r| r.outcome.reason.as_deref() == Some("no response received"))
    );
}

#[tokio::test]
async fn empty_transcription_fails_only_that_check() {
    let url = spawn_stub(StubMode::EmptyTranscription).await;
    let report = run_suite(&fast_config(url)).await;

    assert_eq!(failed(&report), ["Get Transcription"]);
    assert_eq!(
        report.results()[7].outcome.reason.as_deref(),
        Some("empty transcription")
    );
}

#[tokio::test]
async fn garbage_frames_are_skipped() {
    let url = spawn_stub(StubMode::GarbageFirst).await;
    let report = run_suite(&fast_config(url)).await;

    assert!(report.all_passed(), "failed: {:?}", failed(&report));
}

#[tokio::test]
async fn unreachable_server_fails_every_check() {
    let mut config = fast_config(unreachable_url().await);
    config.connect_timeout = Duration::from_secs(2);
    let report = run_suite(&config).await;

    assert_eq!(report.total(), 8);
    assert_eq!(report.passed(), 0);
    assert_eq!(
        report.results()[3].outcome.reason.as_deref(),
        Some("could not send command")
    );
    assert!(report.summary_lines().contains(&"Common issues:".to_string()));
}

#[tokio::test]
async fn only_filter_runs_selected_checks() {
    let url = spawn_stub(StubMode::Healthy).await;
    let mut config = fast_config(url);
    config.only = vec!["get_transcription".to_string()];
    let report = run_suite(&config).await;

    let names: Vec<_> = report.results().iter().map(|r| r.name).collect();
    assert_eq!(names, ["Connection", "Get Transcription"]);
    assert!(report.all_passed());
}
