//! # viscal-ics
//!
//! Plain `.ics` files as calendar storage for [`viscal_engine`].
//!
//! [`IcsFileSource`] implements [`CalendarSource`]: one file per calendar, read
//! with [`parse_calendar`] and rewritten whole with [`generate_calendar`] on save.
//!
//! ```no_run
//! use viscal_engine::{Engine, EngineConfig, SystemClock};
//! use viscal_ics::IcsFileSource;
//!
//! # fn main() -> viscal_engine::Result<()> {
//! let config = EngineConfig::default();
//! let mut source = IcsFileSource::new(config.tz()?);
//! let mut engine = Engine::new(config, Box::new(SystemClock))?;
//! engine.load_from(&mut source, "work", "work.ics")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generate;
pub mod parse;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::debug;
use viscal_engine::{CalendarSource, RawEvent};

pub use error::{IcsError, Result};
pub use generate::generate_calendar;
pub use parse::parse_calendar;

/// File-backed [`CalendarSource`]. Floating times and all-day dates are read and
/// written in `tz`.
#[derive(Debug, Clone, Copy)]
pub struct IcsFileSource {
    tz: Tz,
}

impl IcsFileSource {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a source from an IANA zone name.
    pub fn with_timezone(name: &str) -> Result<Self> {
        let tz = name
            .parse()
            .map_err(|_| IcsError::InvalidTimezone(name.to_string()))?;
        Ok(Self::new(tz))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Read the events of one file. A file that does not exist yet is an empty
    /// calendar.
    pub fn read(&self, path: &Path) -> Result<Vec<RawEvent>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no calendar file yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        parse_calendar(&content, path, self.tz)
    }

    /// Replace the file's contents with `records`.
    pub fn write(&self, path: &Path, records: &[RawEvent]) -> Result<()> {
        let ics = generate_calendar(records, self.tz, Utc::now());
        fs::write(path, ics)?;
        debug!(path = %path.display(), events = records.len(), "wrote calendar");
        Ok(())
    }
}

impl CalendarSource for IcsFileSource {
    fn load(&mut self, path: &Path) -> viscal_engine::Result<Vec<RawEvent>> {
        Ok(self.read(path)?)
    }

    fn store(&mut self, path: &Path, records: &[RawEvent]) -> viscal_engine::Result<()> {
        Ok(self.write(path, records)?)
    }
}
