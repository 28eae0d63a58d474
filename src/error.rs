use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, TesterError>;

#[derive(Error, Debug)]
pub enum TesterError {
    #[error("Not connected to WebSocket server")]
    NotConnected,

    #[error("Timed out connecting to {url} after {after:?}")]
    ConnectTimeout { url: String, after: Duration },

    #[error("WebSocket error: {source}")]
    WebSocket {
        #[from]
        source: tungstenite::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {source}")]
    Url {
        #[from]
        source: url::ParseError,
    },

    #[error("Invalid scheme `{0}` in WebSocket URL, expected ws or wss")]
    InvalidScheme(String),

    #[error("Unknown check `{0}`")]
    UnknownCheck(String),
}
