//! The ordered event collection shared by selection and rescheduling.
//!
//! Events from every calendar are flattened into one vector kept sorted by start
//! time. Insertion does not sort: it appends, marks the store dirty, and remembers
//! the new event's id so the next [`EventStore::refresh`] can resolve it to its
//! post-sort index. Indices are only meaningful until the next insert, delete, or
//! refresh; hold an [`EventId`] across mutations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::calendar::{Calendar, CalendarId, Event, EventId, EventKind, Interval};
use crate::error::{EngineError, Result};

#[derive(Debug, Default)]
pub struct EventStore {
    calendars: Vec<Calendar>,
    events: Vec<Event>,
    next_id: u64,
    dirty: bool,
    select_after_sort: Option<EventId>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_calendar(&mut self, name: impl Into<String>, location: impl Into<PathBuf>) -> CalendarId {
        let id = CalendarId(self.calendars.len());
        self.calendars.push(Calendar::new(id, name.into(), location.into()));
        id
    }

    pub fn calendars(&self) -> &[Calendar] {
        &self.calendars
    }

    pub fn calendar(&self, id: CalendarId) -> Option<&Calendar> {
        self.calendars.get(id.0)
    }

    pub fn calendar_mut(&mut self, id: CalendarId) -> Option<&mut Calendar> {
        self.calendars.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.events.get_mut(index)
    }

    pub fn get_checked(&self, index: usize) -> Result<&Event> {
        self.events.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.events.len(),
        })
    }

    pub fn index_of(&self, id: EventId) -> Option<usize> {
        self.events.iter().position(|e| e.id() == id)
    }

    /// Whether the event at `index` belongs to a visible calendar.
    pub fn is_visible(&self, index: usize) -> bool {
        self.events
            .get(index)
            .and_then(|e| self.calendar(e.calendar()))
            .is_some_and(|c| c.visible)
    }

    /// Events of one calendar, in store order.
    pub fn calendar_events(&self, calendar: CalendarId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.calendar() == calendar)
    }

    fn next_event_id(&mut self) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an event read from storage. Unlike [`EventStore::insert`] this does not
    /// request selection of the new event.
    pub fn load(
        &mut self,
        calendar: CalendarId,
        uid: String,
        kind: EventKind,
        span: Interval,
        summary: String,
        properties: Vec<(String, String)>,
    ) -> Result<EventId> {
        if self.calendar(calendar).is_none() {
            return Err(EngineError::UnknownCalendar(calendar));
        }
        let id = self.next_event_id();
        let mut event = Event::new(id, uid, kind, span, calendar, summary);
        event.properties = properties;
        self.events.push(event);
        self.dirty = true;
        Ok(id)
    }

    /// Append a new, empty timed event and schedule it for selection after the
    /// next refresh.
    pub fn insert(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, calendar: CalendarId) -> Result<EventId> {
        let span = Interval::new(start, end)?;
        if self.calendar(calendar).is_none() {
            return Err(EngineError::UnknownCalendar(calendar));
        }
        let id = self.next_event_id();
        let uid = format!("{}@viscal", uuid::Uuid::new_v4());
        self.events
            .push(Event::new(id, uid, EventKind::Timed, span, calendar, String::new()));
        self.dirty = true;
        self.select_after_sort = Some(id);
        debug!(?id, %start, %end, "inserted event");
        Ok(id)
    }

    /// First event at or after `from` that overlaps `[start, end)`.
    ///
    /// Events outside `min_start`/`max_end` (when given), all-day events, and events
    /// of hidden calendars are skipped.
    pub fn query_span(
        &self,
        from: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_start: Option<DateTime<Utc>>,
        max_end: Option<DateTime<Utc>>,
    ) -> Option<usize> {
        (from..self.events.len()).find(|&i| {
            let ev = &self.events[i];
            if ev.is_all_day() || !self.is_visible(i) {
                return false;
            }
            if min_start.is_some_and(|m| ev.start() < m) || max_end.is_some_and(|m| ev.end() > m) {
                return false;
            }
            ev.span().overlaps(start, end)
        })
    }

    /// First index whose event starts at or after `t`. Assumes the store is sorted.
    pub fn first_starting_at(&self, t: DateTime<Utc>) -> Option<usize> {
        let i = self.events.partition_point(|e| e.start() < t);
        (i < self.events.len()).then_some(i)
    }

    /// Remove the event at `index`, keeping the relative order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<Event> {
        if index >= self.events.len() {
            return None;
        }
        let event = self.events.remove(index);
        if self.select_after_sort == Some(event.id()) {
            self.select_after_sort = None;
        }
        Some(event)
    }

    /// Remove an event by id, returning the start it had.
    pub fn delete(&mut self, id: EventId) -> Option<DateTime<Utc>> {
        let index = self.index_of(id)?;
        self.remove(index).map(|e| e.start())
    }

    pub fn set_span(&mut self, index: usize, span: Interval) {
        if let Some(ev) = self.events.get_mut(index) {
            ev.set_span(span);
            self.dirty = true;
        }
    }

    /// Move the event at `index` so it starts at `start`, keeping its duration.
    pub fn move_to(&mut self, index: usize, start: DateTime<Utc>) {
        if let Some(ev) = self.events.get_mut(index) {
            ev.move_to(start);
            self.dirty = true;
        }
    }

    /// Turn an all-day event into a timed one spanning the same instants.
    pub fn make_timed(&mut self, index: usize) {
        if let Some(ev) = self.events.get_mut(index) {
            ev.set_kind(EventKind::Timed);
        }
    }

    pub fn set_calendar(&mut self, index: usize, calendar: CalendarId) {
        if let Some(ev) = self.events.get_mut(index) {
            ev.set_calendar(calendar);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Stable sort by start time.
    pub fn sort(&mut self) {
        self.events.sort_by_key(|e| e.start());
        self.dirty = false;
    }

    /// Sort, then resolve a pending "select what was just inserted" request to the
    /// inserted event's new index.
    pub fn refresh(&mut self) -> Option<usize> {
        self.sort();
        let pending = self.select_after_sort.take()?;
        self.index_of(pending)
    }

    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].start() <= w[1].start())
    }
}
