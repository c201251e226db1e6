use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Direction, Position},
    protocol::Command,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Motion {
    Stopped,
    Driving(Direction),
    Steering(Position),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub motion: Motion,
    pub last_vector: Option<Position>,
    pub display_on: bool,
    pub auto_word: bool,
    pub word: Option<String>,
    pub frames_received: u64,
    pub rejected_frames: u64,
    pub last_frame_at: Option<DateTime<Utc>>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            motion: Motion::Stopped,
            last_vector: None,
            display_on: true,
            auto_word: true,
            word: None,
            frames_received: 0,
            rejected_frames: 0,
            last_frame_at: None,
        }
    }
}

impl ControllerState {
    pub fn apply(&mut self, command: &Command, at: DateTime<Utc>) {
        match command {
            Command::Move(direction) => self.motion = Motion::Driving(*direction),
            Command::Stop => self.motion = Motion::Stopped,
            Command::Vector(position) => {
                self.motion = Motion::Steering(*position);
                self.last_vector = Some(*position);
            }
            Command::Display(on) => self.display_on = *on,
            Command::ShowWord(word) => {
                self.word = Some(word.clone());
                self.auto_word = false;
            }
            Command::AutoWord => self.auto_word = true,
        }
        self.frames_received += 1;
        self.last_frame_at = Some(at);
    }

    pub fn reject(&mut self) {
        self.rejected_frames += 1;
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
