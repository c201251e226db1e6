use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward = 0,
    Backward = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "straight" => Ok(Direction::Forward),
            "backward" | "back" => Ok(Direction::Backward),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(FrameError::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    // Negative input and NaN land on 0.
    pub fn from_normalized(x: f64, y: f64) -> Self {
        Self {
            x: scale_axis(x),
            y: scale_axis(y),
        }
    }

    pub fn exceeds_deadband(self, previous: Position, threshold: u8) -> bool {
        let threshold = i16::from(threshold);
        let dx = (i16::from(self.x) - i16::from(previous.x)).abs();
        let dy = (i16::from(self.y) - i16::from(previous.y)).abs();
        dx >= threshold || dy >= threshold
    }
}

fn scale_axis(value: f64) -> u8 {
    // `as` saturates and maps NaN to 0.
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
