//! In-process stand-in for the media app's WebSocket server.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use ws_command_tester::protocol::OutgoingMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    /// Answers every known command with `success: true`.
    Healthy,
    /// Answers commands with `success: false`.
    FailCommands,
    /// Never replies.
    Silent,
    /// Replies to `get_transcription` with an empty string.
    EmptyTranscription,
    /// Sends a non-JSON frame before every reply.
    GarbageFirst,
    /// Closes the connection right after the handshake.
    CloseImmediately,
    /// Drops the socket right after the handshake without a close frame.
    DropImmediately,
}

pub const TRANSCRIPTION: &str = "Welcome back to the show. Today we are talking about \
    audio players, keyboard shortcuts and why nobody reads the manual.";

/// Starts a stub server on an ephemeral port and returns its ws:// URL.
pub async fn spawn_stub(mode: StubMode) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(accept_connection(stream, mode));
        }
    });

    format!("ws://{addr}")
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}")
}

async fn accept_connection(stream: TcpStream, mode: StubMode) {
    let Ok(ws_stream) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    if mode == StubMode::DropImmediately {
        drop(ws_stream);
        return;
    }
    let (mut write, mut read) = ws_stream.split();

    if mode == StubMode::CloseImmediately {
        let _ = write
            .send(Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "bye".into(),
            })))
            .await;
        return;
    }

    while let Some(Ok(msg)) = read.next().await {
        let Message::Text(text) = msg else {
            continue;
        };
        let Ok(incoming) = serde_json::from_str::<OutgoingMessage>(&text) else {
            continue;
        };

        for reply in replies(mode, incoming) {
            if write.send(Message::Text(reply.into())).await.is_err() {
                return;
            }
        }
    }
}

fn replies(mode: StubMode, msg: OutgoingMessage) -> Vec<String> {
    if mode == StubMode::Silent {
        return Vec::new();
    }

    let reply = match msg {
        OutgoingMessage::Heartbeat { .. } => {
            json!({"type": "heartbeat_response", "timestamp": 1_700_000_000_000u64})
        }
        OutgoingMessage::Command { command, data, .. } => command_reply(mode, &command, data),
    };

    let mut out = Vec::new();
    if mode == StubMode::GarbageFirst {
        out.push("this is not json".to_string());
    }
    out.push(reply.to_string());
    out
}

fn command_reply(mode: StubMode, command: &str, data: Value) -> Value {
    if mode == StubMode::FailCommands {
        return json!({
            "type": "response",
            "success": false,
            "command": command,
            "error": "player unavailable",
        });
    }

    let mut reply = json!({"type": "response", "success": true, "command": command, "data": data});
    match command {
        "play_pause" => reply["isPlaying"] = json!(true),
        "next" => reply["currentFile"] = json!("track-2.mp3"),
        "previous" => reply["currentFile"] = json!("track-1.mp3"),
        "forward" => reply["currentTime"] = json!(10.0),
        "backward" => reply["currentTime"] = json!(0.0),
        "get_transcription" => {
            let text = if mode == StubMode::EmptyTranscription {
                ""
            } else {
                TRANSCRIPTION
            };
            reply["transcription"] = json!(text);
        }
        _ => {
            reply["success"] = json!(false);
            reply["error"] = json!("Unknown command");
        }
    }
    reply
}
