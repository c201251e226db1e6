use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Direction, Position},
    error::{FrameError, ProtocolTableError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Stop,
    Vector(Position),
    Display(bool),
    ShowWord(String),
    AutoWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolRevision {
    /// display on/off = 6/7, word = 8, automatic word = 9
    #[default]
    Current,
    /// display on/off = 8/9, word = 6, automatic word = 7
    Legacy,
}

impl ProtocolRevision {
    pub fn table(self) -> ProtocolTable {
        match self {
            ProtocolRevision::Current => ProtocolTable {
                stop: 4,
                vector: 5,
                display_on: 6,
                display_off: 7,
                show_word: 8,
                auto_word: 9,
            },
            // TODO: confirm the on/off order against legacy firmware; only the
            // 8/9 pair is known to be used for the display there.
            ProtocolRevision::Legacy => ProtocolTable {
                stop: 4,
                vector: 5,
                display_on: 8,
                display_off: 9,
                show_word: 6,
                auto_word: 7,
            },
        }
    }
}

impl fmt::Display for ProtocolRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolRevision::Current => f.write_str("current"),
            ProtocolRevision::Legacy => f.write_str("legacy"),
        }
    }
}

impl FromStr for ProtocolRevision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "current" => Ok(ProtocolRevision::Current),
            "legacy" => Ok(ProtocolRevision::Legacy),
            other => Err(format!(
                "unknown protocol revision '{other}' (expected 'current' or 'legacy')"
            )),
        }
    }
}

// Directions are not listed; they always use their ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolTable {
    pub stop: u8,
    pub vector: u8,
    pub display_on: u8,
    pub display_off: u8,
    pub show_word: u8,
    pub auto_word: u8,
}

impl Default for ProtocolTable {
    fn default() -> Self {
        ProtocolRevision::default().table()
    }
}

impl ProtocolTable {
    pub fn validate(&self) -> Result<(), ProtocolTableError> {
        let bare = [
            ("stop", self.stop),
            ("display_on", self.display_on),
            ("display_off", self.display_off),
            ("auto_word", self.auto_word),
        ];
        for (index, &(command, code)) in bare.iter().enumerate() {
            if let Some(&(other, _)) = bare[index + 1..].iter().find(|(_, c)| *c == code) {
                return Err(ProtocolTableError::DuplicateCode {
                    code,
                    first: command,
                    second: other,
                });
            }
        }

        let with_payload = [("vector", self.vector), ("show_word", self.show_word)];
        for (command, code) in bare.into_iter().chain(with_payload) {
            if Direction::from_code(code).is_some() {
                return Err(ProtocolTableError::DirectionCollision { code, command });
            }
        }

        if self.vector == self.show_word {
            return Err(ProtocolTableError::DuplicateCode {
                code: self.vector,
                first: "vector",
                second: "show_word",
            });
        }
        Ok(())
    }

    pub fn encode(&self, command: &Command) -> String {
        match command {
            Command::Move(direction) => direction.code().to_string(),
            Command::Stop => self.stop.to_string(),
            Command::Vector(position) => {
                format!("{};{:>4};{:>4}", self.vector, position.x, position.y)
            }
            Command::Display(true) => self.display_on.to_string(),
            Command::Display(false) => self.display_off.to_string(),
            Command::ShowWord(word) => format!("{};{word}", self.show_word),
            Command::AutoWord => self.auto_word.to_string(),
        }
    }

    pub fn decode(&self, frame: &str) -> Result<Command, FrameError> {
        if frame.is_empty() {
            return Err(FrameError::Empty);
        }

        let (head, payload) = match frame.split_once(';') {
            Some((head, payload)) => (head, Some(payload)),
            None => (frame, None),
        };
        let code: u8 = head
            .trim()
            .parse()
            .map_err(|_| FrameError::UnknownCode(head.to_string()))?;

        match payload {
            Some(payload) if code == self.vector => decode_vector(payload).map(Command::Vector),
            Some(word) if code == self.show_word => Ok(Command::ShowWord(word.to_string())),
            Some(_) if self.bare_command(code).is_some() => {
                Err(FrameError::UnexpectedPayload { code })
            }
            None => match self.bare_command(code) {
                Some(command) => Ok(command),
                None if code == self.vector || code == self.show_word => {
                    Err(FrameError::MissingPayload { code })
                }
                None => Err(FrameError::UnknownCode(head.to_string())),
            },
            Some(_) => Err(FrameError::UnknownCode(head.to_string())),
        }
    }

    fn bare_command(&self, code: u8) -> Option<Command> {
        if let Some(direction) = Direction::from_code(code) {
            Some(Command::Move(direction))
        } else if code == self.stop {
            Some(Command::Stop)
        } else if code == self.display_on {
            Some(Command::Display(true))
        } else if code == self.display_off {
            Some(Command::Display(false))
        } else if code == self.auto_word {
            Some(Command::AutoWord)
        } else {
            None
        }
    }
}

fn decode_vector(payload: &str) -> Result<Position, FrameError> {
    let fields: Vec<&str> = payload.split(';').collect();
    let [x, y] = fields.as_slice() else {
        return Err(FrameError::VectorArity(fields.len()));
    };
    Ok(Position::new(parse_axis(x)?, parse_axis(y)?))
}

fn parse_axis(field: &str) -> Result<u8, FrameError> {
    field
        .trim_start()
        .parse()
        .map_err(|_| FrameError::InvalidVectorField {
            field: field.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
