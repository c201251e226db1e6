use serde::{Deserialize, Serialize};
use shared::error::ProtocolTableError;
use thiserror::Error;
use tracing::{debug, trace};

pub mod dispatch;
pub mod error;
pub mod transport;

pub use dispatch::{ControlRequest, Outcome, ParseRequestError};
pub use error::{TransportError, ValidationError};
pub use shared::{
    domain::{Direction, Position},
    protocol::{Command, ProtocolRevision, ProtocolTable},
};
pub use transport::{
    controller_url, LoggingTransport, MemoryTransport, Transport, TransportEvent, WsTransport,
    DEFAULT_CONTROLLER_PORT,
};

pub const DEFAULT_MAX_LABEL_LENGTH: usize = 4;
pub const DEFAULT_DEADBAND: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub max_label_length: usize,
    pub deadband: u8,
    pub protocol: ProtocolTable,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_label_length: DEFAULT_MAX_LABEL_LENGTH,
            deadband: DEFAULT_DEADBAND,
            protocol: ProtocolTable::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_label_length must be at least 1")]
    ZeroLabelLength,
    #[error("invalid protocol table: {0}")]
    Protocol(#[from] ProtocolTableError),
}

impl ClientConfig {
    pub fn for_revision(revision: ProtocolRevision) -> Self {
        Self {
            protocol: revision.table(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_label_length == 0 {
            return Err(ConfigError::ZeroLabelLength);
        }
        self.protocol.validate()?;
        Ok(())
    }
}

pub struct VehicleClient<T: Transport> {
    transport: T,
    protocol: ProtocolTable,
    max_label_length: usize,
    deadband: u8,
    auto_word_mode: bool,
    display_on: bool,
    // None until the first vector goes out.
    last_position: Option<Position>,
}

impl<T: Transport> VehicleClient<T> {
    pub fn new(transport: T) -> Self {
        Self::from_parts(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(transport, config))
    }

    fn from_parts(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            protocol: config.protocol,
            max_label_length: config.max_label_length,
            deadband: config.deadband,
            auto_word_mode: true,
            display_on: true,
            last_position: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn protocol(&self) -> &ProtocolTable {
        &self.protocol
    }

    pub fn max_label_length(&self) -> usize {
        self.max_label_length
    }

    pub fn auto_word_mode(&self) -> bool {
        self.auto_word_mode
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    /// Last vector actually transmitted, or the origin before any was.
    pub fn last_position(&self) -> Position {
        self.last_position.unwrap_or(Position::ORIGIN)
    }

    pub fn move_directional(&self, direction: Direction) {
        self.transmit(&Command::Move(direction));
    }

    /// Returns `false` when the position is inside the deadband and nothing was sent.
    pub fn move_vector(&mut self, x: f64, y: f64) -> bool {
        let position = Position::from_normalized(x, y);
        if let Some(last) = self.last_position {
            if !position.exceeds_deadband(last, self.deadband) {
                trace!(?position, ?last, "vector inside deadband");
                return false;
            }
        }
        self.transmit(&Command::Vector(position));
        self.last_position = Some(position);
        true
    }

    pub fn stop(&self) {
        self.transmit(&Command::Stop);
    }

    pub fn show_word(&mut self, word: &str) -> Result<(), ValidationError> {
        if word.chars().count() > self.max_label_length {
            return Err(ValidationError::WordTooLong {
                word: word.to_string(),
                max: self.max_label_length,
            });
        }
        self.transmit(&Command::ShowWord(word.to_string()));
        self.auto_word_mode = false;
        Ok(())
    }

    pub fn enable_auto_word(&mut self) {
        self.transmit(&Command::AutoWord);
        self.auto_word_mode = true;
    }

    pub fn set_display(&mut self, on: bool) {
        self.transmit(&Command::Display(on));
        self.display_on = on;
    }

    pub fn toggle_display(&mut self) -> bool {
        let on = !self.display_on;
        self.set_display(on);
        on
    }

    fn transmit(&self, command: &Command) {
        let frame = self.protocol.encode(command);
        debug!(%frame, "sending frame");
        self.transport.send(&frame);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
