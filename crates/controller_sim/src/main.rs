use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use shared::protocol::ProtocolTable;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::load_settings;
use state::ControllerState;

struct AppState {
    protocol: ProtocolTable,
    controller: Mutex<ControllerState>,
}

impl AppState {
    fn new(protocol: ProtocolTable) -> Self {
        Self {
            protocol,
            controller: Mutex::new(ControllerState::default()),
        }
    }

    async fn handle_frame(&self, frame: &str) {
        let mut controller = self.controller.lock().await;
        match self.protocol.decode(frame) {
            Ok(command) => {
                info!(frame, ?command, "frame accepted");
                controller.apply(&command, Utc::now());
            }
            Err(err) => {
                warn!(frame, %err, "frame rejected");
                controller.reject();
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(%addr, protocol = ?settings.protocol, "controller simulator listening");
    let app = build_router(Arc::new(AppState::new(settings.protocol)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/state", get(controller_state))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn controller_state(State(state): State<Arc<AppState>>) -> Json<ControllerState> {
    Json(state.controller.lock().await.clone())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: Arc<AppState>, mut socket: WebSocket) {
    info!("remote control connected");
    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(frame)) => state.handle_frame(&frame).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "websocket receive failed");
                break;
            }
        }
    }
    info!("remote control disconnected");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
