use std::io::Write;

use env_logger::Env;
use log::LevelFilter;

/// Installs `[HH:MM:SS] LEVEL: message` logging. `RUST_LOG` wins over the
/// verbosity flag when set.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .filter_module("tungstenite", LevelFilter::Warn)
        .filter_module("tokio_tungstenite", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
