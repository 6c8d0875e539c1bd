//! Error types for viscal-engine operations.
//!
//! Most of these never reach the host: user-triggered commands recover from them
//! locally and turn into no-ops. Only construction and persistence return them.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::calendar::CalendarId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid interval: end {end} is before start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Index {index} out of range for {len} events")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No calendar available for insertion")]
    NoCalendarAvailable,

    #[error("Edit requested with nothing selected")]
    EditWithoutSelection,

    #[error("Unknown calendar: {0:?}")]
    UnknownCalendar(CalendarId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
