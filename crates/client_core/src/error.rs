use thiserror::Error;

pub use shared::error::ValidationError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid controller address '{address}': {source}")]
    InvalidAddress {
        address: String,
        source: url::ParseError,
    },
    #[error("controller host '{host}' must be a bare host name or address")]
    InvalidHost { host: String },
    #[error("failed to connect websocket {url}: {source}")]
    Connect {
        url: String,
        source: tokio_tungstenite::tungstenite::Error,
    },
}
