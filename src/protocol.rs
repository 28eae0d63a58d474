//! JSON messages exchanged with the endpoint under test.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const HEARTBEAT_RESPONSE: &str = "heartbeat_response";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    Command {
        command: String,
        timestamp: f64,
        data: Value,
    },
    Heartbeat {
        timestamp: f64,
    },
}

impl OutgoingMessage {
    pub fn command(command: impl Into<String>, data: Option<Value>) -> Self {
        OutgoingMessage::Command {
            command: command.into(),
            timestamp: unix_timestamp(),
            data: data.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }

    pub fn heartbeat() -> Self {
        OutgoingMessage::Heartbeat {
            timestamp: unix_timestamp(),
        }
    }
}

/// The fields of a command reply the checks look at. Anything else the
/// server sends is kept in `extra` so it can be logged. Only `success` has a
/// required shape; `error` and `transcription` may be any JSON value.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CommandResponse {
    pub success: bool,
    pub error: Option<Value>,
    pub transcription: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommandResponse {
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        CommandResponse::deserialize(value)
    }

    pub fn error_message(&self) -> String {
        match &self.error {
            None | Some(Value::Null) => "Unknown error".to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// The transcription text, empty when missing or not a string.
    pub fn transcription_text(&self) -> &str {
        self.transcription
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

pub fn is_reply_to(value: &Value, command: &str) -> bool {
    value.get("command").and_then(Value::as_str) == Some(command)
}

pub fn is_heartbeat_response(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(HEARTBEAT_RESPONSE)
}

fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
