//! Error types for reading and writing `.ics` files.

use std::path::PathBuf;

use thiserror::Error;
use viscal_engine::EngineError;

#[derive(Error, Debug)]
pub enum IcsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Event {uid} is missing {property}")]
    MissingProperty { uid: String, property: &'static str },

    #[error("Event {uid} has an unreadable DURATION: {value}")]
    InvalidDuration { uid: String, value: String },

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Event ends before it starts")]
    InvalidInterval,
}

pub type Result<T> = std::result::Result<T, IcsError>;

impl From<IcsError> for EngineError {
    fn from(err: IcsError) -> Self {
        EngineError::Storage(err.to_string())
    }
}
