//! Calendars, events, and the intervals they occupy.
//!
//! An [`Event`] is owned by exactly one [`Calendar`], referenced by [`CalendarId`].
//! Reassigning an event to another calendar swaps that id; the event itself is never
//! copied. Per-frame view state ([`ViewState`]) rides along on the event but is never
//! persisted.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{EngineError, Result};

/// Index of a calendar in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CalendarId(pub usize);

/// Stable identity of an event across sorts, inserts, and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventId(pub u64);

/// A half-open time span `[start, end)` with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the shared part of two spans; zero when they only touch.
    pub fn overlap(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let shared = self.end.min(end) - self.start.max(start);
        shared.max(Duration::zero())
    }

    /// Whether the spans share a positive amount of time.
    /// Adjacent spans (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.overlap(start, end) > Duration::zero()
    }

    /// Same duration, new start.
    pub fn moved_to(&self, start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + self.duration(),
        }
    }

    pub fn shifted(&self, delta: Duration) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

/// Timed events occupy part of the timeline; all-day events live in the gutter
/// and have no intraday span for scheduling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Timed,
    AllDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Edge-inclusive hit test.
    pub fn contains(&self, mx: f64, my: f64) -> bool {
        mx >= self.x && mx <= self.x + self.width && my >= self.y && my <= self.y + self.height
    }
}

/// Transient per-frame state, derived from the event and the current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub highlighted: bool,
    pub dragging: bool,
    /// Rectangle computed by the last layout pass.
    pub rect: Rect,
    /// `rect.y - pointer_y` at the moment the button went down.
    pub drag_offset: f64,
    /// Snapped start time the event would move to if dropped now.
    pub drag_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Event {
    id: EventId,
    uid: String,
    kind: EventKind,
    span: Interval,
    calendar: CalendarId,
    pub summary: String,
    /// Storage properties the engine does not interpret, kept for round-tripping.
    pub properties: Vec<(String, String)>,
    pub view: ViewState,
}

impl Event {
    pub(crate) fn new(
        id: EventId,
        uid: String,
        kind: EventKind,
        span: Interval,
        calendar: CalendarId,
        summary: String,
    ) -> Self {
        Self {
            id,
            uid,
            kind,
            span,
            calendar,
            summary,
            properties: Vec::new(),
            view: ViewState::default(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_all_day(&self) -> bool {
        self.kind == EventKind::AllDay
    }

    pub fn span(&self) -> Interval {
        self.span
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.span.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.span.end
    }

    pub fn duration(&self) -> Duration {
        self.span.duration()
    }

    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    pub(crate) fn set_span(&mut self, span: Interval) {
        self.span = span;
    }

    /// Move to `start`, keeping the duration.
    pub(crate) fn move_to(&mut self, start: DateTime<Utc>) {
        self.span = self.span.moved_to(start);
    }

    pub(crate) fn set_calendar(&mut self, calendar: CalendarId) {
        self.calendar = calendar;
    }

    pub(crate) fn set_kind(&mut self, kind: EventKind) {
        self.kind = kind;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Move each channel away from (`change > 1`) or towards (`change < 1`) the
    /// perceived brightness of the color.
    pub fn saturate(self, change: f64) -> Self {
        const PR: f64 = 0.299;
        const PG: f64 = 0.587;
        const PB: f64 = 0.114;
        let p = (self.r * self.r * PR + self.g * self.g * PG + self.b * self.b * PB).sqrt();
        Self {
            r: p + (self.r - p) * change,
            g: p + (self.g - p) * change,
            b: p + (self.b - p) * change,
            a: self.a,
        }
    }

    /// Deterministic per-calendar color: primary/secondary hues, desaturated.
    pub fn for_calendar(index: usize) -> Self {
        const HUES: [(f64, f64, f64); 6] = [
            (0.0, 1.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (0.0, 1.0, 0.0),
            (1.0, 0.0, 0.0),
        ];
        let (r, g, b) = HUES[index % HUES.len()];
        Self { r, g, b, a: 0.9 }.saturate(0.5)
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    id: CalendarId,
    pub name: String,
    pub color: Rgba,
    pub visible: bool,
    /// Where the storage collaborator reads and writes this calendar.
    pub location: PathBuf,
}

impl Calendar {
    pub(crate) fn new(id: CalendarId, name: String, location: PathBuf) -> Self {
        Self {
            id,
            name,
            color: Rgba::for_calendar(id.0),
            visible: true,
            location,
        }
    }

    pub fn id(&self) -> CalendarId {
        self.id
    }
}
