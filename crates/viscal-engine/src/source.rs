//! Collaborator seams: calendar storage and the wall clock.
//!
//! The engine never parses or writes calendar documents itself. A host supplies a
//! [`CalendarSource`] (see the `viscal-ics` crate for the file-backed one) and a
//! [`Clock`]; the engine hands storage flat [`RawEvent`] records.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// One event as storage sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub all_day: bool,
    /// Properties the engine carries but does not interpret.
    pub properties: Vec<(String, String)>,
}

pub trait CalendarSource {
    fn load(&mut self, path: &Path) -> Result<Vec<RawEvent>>;

    fn store(&mut self, path: &Path, records: &[RawEvent]) -> Result<()>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
