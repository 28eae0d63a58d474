use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::debug;
use ws_command_tester::config::{DEFAULT_HOST, DEFAULT_PORT, TesterConfig, ws_url};
use ws_command_tester::{SuiteReport, logging, run_suite};

/// Test a WebSocket server's command handlers
#[derive(Debug, Parser)]
#[command(name = "ws-command-tester")]
#[command(version, about, long_about = None)]
struct Cli {
    /// WebSocket server host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// WebSocket server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Full ws:// or wss:// URL, overrides --host and --port
    #[arg(long)]
    url: Option<String>,

    /// Seconds to wait for each command response
    #[arg(long, default_value_t = 3)]
    timeout: u64,

    /// Seconds to wait for the heartbeat response
    #[arg(long, default_value_t = 1)]
    heartbeat_wait: u64,

    /// Milliseconds to pause between checks
    #[arg(long, default_value_t = 500)]
    delay: u64,

    /// Seconds to wait for the connection handshake
    #[arg(long, default_value_t = 5)]
    connect_timeout: u64,

    /// Only run the named checks (command or display name), repeatable
    #[arg(long = "only", value_name = "CHECK")]
    only: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> TesterConfig {
        TesterConfig {
            url: self.url.unwrap_or_else(|| ws_url(&self.host, self.port)),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            response_timeout: Duration::from_secs(self.timeout),
            heartbeat_wait: Duration::from_secs(self.heartbeat_wait),
            delay_between_tests: Duration::from_millis(self.delay),
            only: self.only,
            ..TesterConfig::default()
        }
    }
}

/// 0 when every check passed, 1 otherwise.
fn exit_status(report: &SuiteReport) -> u8 {
    if report.all_passed() { 0 } else { 1 }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.into_config();
    if let Err(e) = config.validate() {
        println!("Fatal error: {e}");
        return ExitCode::FAILURE;
    }
    debug!("{config:?}");

    tokio::select! {
        report = run_suite(&config) => {
            report.log_summary();
            ExitCode::from(exit_status(&report))
        }
        Ok(()) = tokio::signal::ctrl_c() => {
            println!();
            println!("Test interrupted by user");
            ExitCode::SUCCESS
        }
    }
}
