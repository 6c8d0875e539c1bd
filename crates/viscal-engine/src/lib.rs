//! # viscal-engine
//!
//! The scheduling core of a keyboard-driven day-timeline calendar.
//!
//! The engine keeps a sorted set of time-blocked events from one or more
//! calendars, maps them to and from screen position under pan and zoom, and
//! applies navigation, drag, and cascading-reschedule edits. It never draws a
//! pixel or parses a calendar file: hosts paint [`Layout`] and plug storage in
//! through [`CalendarSource`].
//!
//! ## Modules
//!
//! - [`geometry`]: time to location to pixel mapping, zoom, view panning
//! - [`calendar`]: calendars, events, intervals
//! - [`store`]: the sorted event collection
//! - [`selection`]: selection and cursor navigation
//! - [`drag`]: press, drag, release, hover
//! - [`reschedule`]: cascading push rescheduling
//! - [`command`]: key chords and repeat counts
//! - [`edit`]: summary editing
//! - [`engine`]: the session object tying it all together
//! - [`config`], [`source`], [`error`]

pub mod calendar;
pub mod command;
pub mod config;
pub mod drag;
pub mod edit;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod reschedule;
pub mod selection;
pub mod source;
pub mod store;

pub use calendar::{Calendar, CalendarId, Event, EventId, EventKind, Interval, Rect, Rgba};
pub use command::{Command, CommandDispatcher, Dispatch, Key};
pub use config::{CascadeScope, EngineConfig};
pub use engine::{Engine, Layout, LayoutItem};
pub use error::{EngineError, Result};
pub use geometry::{format_duration, ViewConfig, Viewport};
pub use source::{CalendarSource, Clock, FixedClock, RawEvent, SystemClock};
pub use store::EventStore;
