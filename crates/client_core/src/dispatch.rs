use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::domain::Direction;
use thiserror::Error;

use crate::{error::ValidationError, transport::Transport, VehicleClient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ControlRequest {
    Move { direction: Direction },
    Vector { x: f64, y: f64 },
    Stop,
    ShowWord { word: String },
    AutoWord,
    Display { on: bool },
    ToggleDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRequestError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' expects {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unknown direction '{0}'")]
    InvalidDirection(String),
    #[error("expected 'on' or 'off', got '{0}'")]
    InvalidSwitch(String),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl ControlRequest {
    pub fn apply<T: Transport>(
        &self,
        client: &mut VehicleClient<T>,
    ) -> Result<Outcome, ValidationError> {
        match self {
            ControlRequest::Move { direction } => client.move_directional(*direction),
            ControlRequest::Vector { x, y } => {
                return Ok(if client.move_vector(*x, *y) {
                    Outcome::Sent
                } else {
                    Outcome::Suppressed
                });
            }
            ControlRequest::Stop => client.stop(),
            ControlRequest::ShowWord { word } => client.show_word(word)?,
            ControlRequest::AutoWord => client.enable_auto_word(),
            ControlRequest::Display { on } => client.set_display(*on),
            ControlRequest::ToggleDisplay => {
                client.toggle_display();
            }
        }
        Ok(Outcome::Sent)
    }
}

// e.g. `left`, `vector 0.5 -0.25`, `word HOLA`, `display off`
impl FromStr for ControlRequest {
    type Err = ParseRequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        if head.is_empty() {
            return Err(ParseRequestError::Empty);
        }

        let request = match head.to_ascii_lowercase().as_str() {
            "move" | "go" => {
                if rest.is_empty() {
                    return Err(ParseRequestError::MissingArgument {
                        command: "move",
                        argument: "a direction",
                    });
                }
                let direction = rest
                    .parse()
                    .map_err(|_| ParseRequestError::InvalidDirection(rest.to_string()))?;
                return Ok(ControlRequest::Move { direction });
            }
            "vector" | "v" => {
                let mut args = rest.split_whitespace();
                let (Some(x), Some(y)) = (args.next(), args.next()) else {
                    return Err(ParseRequestError::MissingArgument {
                        command: "vector",
                        argument: "two numbers",
                    });
                };
                if let Some(extra) = args.next() {
                    return Err(ParseRequestError::TrailingInput(extra.to_string()));
                }
                return Ok(ControlRequest::Vector {
                    x: parse_number(x)?,
                    y: parse_number(y)?,
                });
            }
            "word" | "say" => {
                if rest.is_empty() {
                    return Err(ParseRequestError::MissingArgument {
                        command: "word",
                        argument: "a word",
                    });
                }
                return Ok(ControlRequest::ShowWord {
                    word: rest.to_string(),
                });
            }
            "display" => {
                return match rest.to_ascii_lowercase().as_str() {
                    "" | "toggle" => Ok(ControlRequest::ToggleDisplay),
                    "on" => Ok(ControlRequest::Display { on: true }),
                    "off" => Ok(ControlRequest::Display { on: false }),
                    _ => Err(ParseRequestError::InvalidSwitch(rest.to_string())),
                };
            }
            "stop" => ControlRequest::Stop,
            "auto" | "auto-word" => ControlRequest::AutoWord,
            "toggle-display" => ControlRequest::ToggleDisplay,
            other => match other.parse::<Direction>() {
                Ok(direction) => ControlRequest::Move { direction },
                Err(_) => return Err(ParseRequestError::UnknownCommand(head.to_string())),
            },
        };

        if !rest.is_empty() {
            return Err(ParseRequestError::TrailingInput(rest.to_string()));
        }
        Ok(request)
    }
}

fn parse_number(raw: &str) -> Result<f64, ParseRequestError> {
    raw.parse()
        .map_err(|_| ParseRequestError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
