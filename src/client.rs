//! Single WebSocket connection with a background reader.
//!
//! Every JSON text frame the server sends is appended to a shared buffer by
//! one spawned reader task. Callers correlate replies by polling that buffer
//! until a matching value shows up or a deadline passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::{Result, TesterError};
use crate::protocol::{self, OutgoingMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_GRACE: Duration = Duration::from_secs(1);

pub struct TesterClient {
    url: String,
    write: SplitSink<WsStream, Message>,
    responses: Arc<Mutex<Vec<Value>>>,
    connected: Arc<AtomicBool>,
    poll_interval: Duration,
    reader: JoinHandle<()>,
}

impl TesterClient {
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self> {
        info!("Connecting to {url}");

        let (ws_stream, _) = timeout(connect_timeout, connect_async(url))
            .await
            .map_err(|_| TesterError::ConnectTimeout {
                url: url.to_string(),
                after: connect_timeout,
            })??;

        info!("✓ Connected to WebSocket server");

        let (write, read) = ws_stream.split();
        let responses = Arc::new(Mutex::new(Vec::new()));
        let connected = Arc::new(AtomicBool::new(true));

        let reader = tokio::spawn(read_loop(read, responses.clone(), connected.clone()));

        Ok(Self {
            url: url.to_string(),
            write,
            responses,
            connected,
            poll_interval,
            reader,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub async fn send_command(&mut self, command: &str, data: Option<Value>) -> Result<()> {
        self.send(&OutgoingMessage::command(command, data)).await?;
        info!("Sent command: {command}");
        Ok(())
    }

    pub async fn send_heartbeat(&mut self) -> Result<()> {
        self.send(&OutgoingMessage::heartbeat()).await?;
        info!("Sent heartbeat");
        Ok(())
    }

    async fn send(&mut self, msg: &OutgoingMessage) -> Result<()> {
        if !self.is_connected() {
            return Err(TesterError::NotConnected);
        }
        let json = serde_json::to_string(msg)?;
        self.write.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Waits for a reply whose `command` field equals `command`.
    pub async fn wait_for_response(&self, command: &str, within: Duration) -> Option<Value> {
        self.wait_for(|value| protocol::is_reply_to(value, command), within)
            .await
    }

    /// Polls the buffer until `predicate` matches a value or `within` elapses.
    /// The matched value is taken out of the buffer.
    pub async fn wait_for<F>(&self, predicate: F, within: Duration) -> Option<Value>
    where
        F: Fn(&Value) -> bool,
    {
        let deadline = Instant::now() + within;
        loop {
            {
                let mut responses = self.responses.lock().await;
                if let Some(pos) = responses.iter().position(&predicate) {
                    return Some(responses.remove(pos));
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Number of received messages not yet claimed by a wait.
    pub async fn buffered(&self) -> usize {
        self.responses.lock().await.len()
    }

    pub async fn close(mut self) {
        if self.is_connected()
            && let Err(e) = self.write.close().await
        {
            debug!("Error sending close frame: {e}");
        }
        if timeout(CLOSE_GRACE, &mut self.reader).await.is_err() {
            self.reader.abort();
        }
    }
}

async fn read_loop(
    mut read: SplitStream<WsStream>,
    responses: Arc<Mutex<Vec<Value>>>,
    connected: Arc<AtomicBool>,
) {
    let mut close_seen = false;
    while let Some(result) = read.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => {
                    info!("Received: {value}");
                    responses.lock().await.push(value);
                }
                Err(e) => {
                    error!("Invalid JSON received: {e}");
                }
            },
            Ok(Message::Binary(data)) => {
                debug!("Ignored binary frame of {} bytes", data.len());
            }
            Ok(Message::Close(frame)) => {
                close_seen = true;
                match frame {
                    Some(frame) => {
                        info!(
                            "Connection closed: {} - {}",
                            u16::from(frame.code),
                            frame.reason
                        );
                    }
                    None => info!("Connection closed: no status"),
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error: {e}");
                break;
            }
        }
    }
    if !close_seen {
        info!("Connection closed: stream ended without a close frame");
    }
    connected.store(false, Ordering::SeqCst);
}
