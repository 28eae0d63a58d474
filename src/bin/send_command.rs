use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use ws_command_tester::config::{DEFAULT_HOST, DEFAULT_PORT, TesterConfig, ws_url};
use ws_command_tester::{Result, TesterClient, logging};

/// Send one command and print the server's reply
#[derive(Debug, Parser)]
#[command(name = "send_command")]
struct Args {
    /// Command name, e.g. play_pause
    command: String,

    /// JSON object sent as the command's `data`
    #[arg(long)]
    data: Option<String>,

    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Full ws:// or wss:// URL, overrides --host and --port
    #[arg(long)]
    url: Option<String>,

    /// Seconds to wait for the reply
    #[arg(long, default_value_t = 3)]
    timeout: u64,
}

impl Args {
    fn target_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| ws_url(&self.host, self.port))
    }
}

/// A reply counts as success only when it carries `"success": true`.
fn reply_succeeded(reply: &Value) -> bool {
    reply.get("success").and_then(Value::as_bool).unwrap_or(false)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(false);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    let data = args
        .data
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()?;

    let config = TesterConfig::with_url(args.target_url());
    config.validate()?;

    let mut client =
        TesterClient::connect(&config.url, config.connect_timeout, config.poll_interval).await?;
    client.send_command(&args.command, data).await?;
    println!("🚀 Sent {}", args.command);

    let reply = client
        .wait_for_response(&args.command, Duration::from_secs(args.timeout))
        .await;
    client.close().await;

    match reply {
        Some(value) => {
            println!("📩 Server: {}", serde_json::to_string_pretty(&value)?);
            Ok(reply_succeeded(&value))
        }
        None => {
            println!("⚠️ No reply to {} within {}s", args.command, args.timeout);
            Ok(false)
        }
    }
}
