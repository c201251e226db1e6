use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_CONTROLLER_PORT: u16 = 80;
const FALLBACK_HOST: &str = "localhost";
const EVENT_CAPACITY: usize = 16;

pub fn controller_url(host: &str, port: u16) -> Result<Url, TransportError> {
    let host = host.trim();
    let host = if host.is_empty() { FALLBACK_HOST } else { host };
    let address = format!("ws://{host}:{port}/ws");
    let url = Url::parse(&address)
        .map_err(|source| TransportError::InvalidAddress { address, source })?;
    match url.host_str() {
        Some(parsed) if parsed.eq_ignore_ascii_case(host) => Ok(url),
        _ => Err(TransportError::InvalidHost {
            host: host.to_string(),
        }),
    }
}

pub trait Transport {
    fn send(&self, frame: &str);
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, frame: &str) {
        (**self).send(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, frame: &str) {
        (**self).send(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, frame: &str) {
        (**self).send(frame)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Error(String),
    Closed,
}

pub struct WsTransport {
    url: Url,
    outbound: mpsc::UnboundedSender<String>,
    events: broadcast::Sender<TransportEvent>,
    writer: JoinHandle<()>,
}

impl WsTransport {
    pub async fn connect(url: Url) -> Result<Self, TransportError> {
        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|source| TransportError::Connect {
                url: url.to_string(),
                source,
            })?;
        info!(%url, "connected to controller");
        let (mut ws_writer, mut ws_reader) = ws_stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let writer_events = events.clone();
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(err) = ws_writer.send(Message::Text(frame)).await {
                    warn!(%err, "websocket send failed");
                    let _ = writer_events.send(TransportEvent::Error(format!(
                        "websocket send failed: {err}"
                    )));
                    return;
                }
            }
            let _ = ws_writer.close().await;
        });

        let reader_events = events.clone();
        tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                match msg {
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, "websocket receive failed");
                        let _ = reader_events.send(TransportEvent::Error(format!(
                            "websocket receive failed: {err}"
                        )));
                        break;
                    }
                }
            }
            info!("controller connection closed");
            let _ = reader_events.send(TransportEvent::Closed);
        });

        Ok(Self {
            url,
            outbound,
            events,
            writer,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }

    pub async fn shutdown(self) {
        let Self { outbound, writer, .. } = self;
        drop(outbound);
        if let Err(err) = writer.await {
            warn!(%err, "websocket writer task failed");
        }
    }
}

impl Transport for WsTransport {
    fn send(&self, frame: &str) {
        if self.outbound.send(frame.to_string()).is_err() {
            debug!(frame, "dropping frame: controller connection is gone");
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTransport;

impl Transport for LoggingTransport {
    fn send(&self, frame: &str) {
        info!(frame, "mock transport");
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    frames: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames
            .lock()
            .map(|frames| frames.clone())
            .unwrap_or_default()
    }

    pub fn take_frames(&self) -> Vec<String> {
        self.frames
            .lock()
            .map(|mut frames| std::mem::take(&mut *frames))
            .unwrap_or_default()
    }
}

impl Transport for MemoryTransport {
    fn send(&self, frame: &str) {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(frame.to_string());
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
