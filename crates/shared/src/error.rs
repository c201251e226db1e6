use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{word}' has too many letters (max {max})")]
    WordTooLong { word: String, max: usize },
}

impl ValidationError {
    pub fn word(&self) -> &str {
        match self {
            ValidationError::WordTooLong { word, .. } => word,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("unknown command code '{0}'")]
    UnknownCode(String),
    #[error("command code {code} does not take a payload")]
    UnexpectedPayload { code: u8 },
    #[error("command code {code} requires a payload")]
    MissingPayload { code: u8 },
    #[error("invalid vector field '{field}': expected an integer in 0..=255")]
    InvalidVectorField { field: String },
    #[error("vector frame must carry exactly two fields, got {0}")]
    VectorArity(usize),
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolTableError {
    #[error("code {code} is used by both {first} and {second}")]
    DuplicateCode {
        code: u8,
        first: &'static str,
        second: &'static str,
    },
    #[error("code {code} for {command} collides with a direction code")]
    DirectionCollision { code: u8, command: &'static str },
}
