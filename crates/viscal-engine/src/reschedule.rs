//! Cascading push rescheduling.
//!
//! When an edit would overlap a neighbor, the neighbor is shifted by the minimum
//! needed to clear it, and so on down (or up) the sorted store until a gap absorbs
//! the shift. Durations never change. How far a cascade may walk is one global
//! [`CascadeScope`]: the local day of the event that starts it, or the whole store.
//!
//! Cascades are index walks over a sorted store: each step visits a strictly
//! smaller or larger index, so a cascade touches each event at most once.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::{CalendarId, Interval};
use crate::config::CascadeScope;
use crate::geometry::{day_bounds, SMALLEST_TIMEBLOCK};
use crate::selection::SelectionModel;
use crate::store::EventStore;

/// Where `open_below` wants a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Calendar of the event the slot was opened below, if any.
    pub calendar: Option<CalendarId>,
}

#[derive(Debug, Clone, Copy)]
pub struct Rescheduler {
    scope: CascadeScope,
    tz: Tz,
}

impl Rescheduler {
    pub fn new(scope: CascadeScope, tz: Tz) -> Self {
        Self { scope, tz }
    }

    pub fn scope(&self) -> CascadeScope {
        self.scope
    }

    /// Local day containing `t`, when cascades are day-bounded.
    fn day_of(&self, t: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self.scope {
            CascadeScope::Day => Some(day_bounds(t, self.tz)),
            CascadeScope::Unbounded => None,
        }
    }

    /// Move the event at `from` to start at `push_to`, then shove each following
    /// event that now overlaps its predecessor down to that predecessor's new end.
    ///
    /// Does nothing if the event already starts at or after `push_to`. Events that
    /// start on a later day than `from` are left alone under [`CascadeScope::Day`].
    /// Returns how many events moved.
    pub fn push_down(&self, store: &mut EventStore, from: usize, push_to: DateTime<Utc>) -> usize {
        let Some(first) = store.get(from) else {
            return 0;
        };
        let day_end = self.day_of(first.start()).map(|(_, end)| end);

        let mut to = push_to;
        let mut moved = 0;
        for i in from..store.len() {
            let ev = &store.events()[i];
            if ev.is_all_day() {
                continue;
            }
            if ev.start() >= to || day_end.is_some_and(|end| ev.start() >= end) {
                break;
            }
            let new_end = to + ev.duration();
            debug!(index = i, from = %ev.start(), to = %to, "push down");
            store.move_to(i, to);
            moved += 1;
            to = new_end;
        }
        debug_assert!(moved <= store.len());
        moved
    }

    /// Move the event at `from` up to start at `push_to`, then pull each preceding
    /// event whose end now passes that start up so it ends exactly there.
    ///
    /// Does nothing if the event already starts at or before `push_to`.
    /// Returns how many events moved.
    pub fn push_up(&self, store: &mut EventStore, from: usize, push_to: DateTime<Utc>) -> usize {
        let Some(first) = store.get(from) else {
            return 0;
        };
        if first.is_all_day() || first.start() <= push_to {
            return 0;
        }
        let day_start = self.day_of(first.start()).map(|(start, _)| start);

        store.move_to(from, push_to);
        let mut boundary = push_to;
        let mut moved = 1;
        for i in (0..from).rev() {
            let ev = &store.events()[i];
            if ev.is_all_day() {
                continue;
            }
            if ev.end() <= boundary || day_start.is_some_and(|start| ev.start() < start) {
                break;
            }
            let new_start = boundary - ev.duration();
            debug!(index = i, from = %ev.start(), to = %new_start, "push up");
            store.move_to(i, new_start);
            moved += 1;
            boundary = new_start;
        }
        moved
    }

    /// Close the gap `[gap_start, gap_end)`: every timed event starting at or after
    /// `gap_end` moves up by the gap's length. Under [`CascadeScope::Day`] only
    /// events on the local day of `gap_start` move. Returns how many moved.
    pub fn close_gap(&self, store: &mut EventStore, gap_start: DateTime<Utc>, gap_end: DateTime<Utc>) -> usize {
        let Some(first) = store.first_starting_at(gap_end) else {
            return 0;
        };
        let delta = gap_end - gap_start;
        let day_end = self.day_of(gap_start).map(|(_, end)| end);

        let mut moved = 0;
        for i in first..store.len() {
            let ev = &store.events()[i];
            if day_end.is_some_and(|end| ev.start() >= end) {
                break;
            }
            if ev.is_all_day() {
                continue;
            }
            let span = ev.span().shifted(-delta);
            store.set_span(i, span);
            moved += 1;
        }
        debug!(moved, %gap_start, %gap_end, "closed gap");
        moved
    }

    /// Grow (`sign > 0`) or shrink the selection by [`SMALLEST_TIMEBLOCK`] minutes:
    /// the selected event's end, or the cursor block when nothing is selected.
    /// Refuses to shrink to zero or below. Returns whether anything changed.
    pub fn expand_selection(&self, store: &mut EventStore, selection: &mut SelectionModel, sign: i32) -> bool {
        let minutes = SMALLEST_TIMEBLOCK * sign as i64;
        let size = selection.effective_timeblock(store);
        if size + minutes <= 0 {
            return false;
        }
        match selection.selected().and_then(|i| store.get(i).map(|e| (i, e.span()))) {
            None => {
                selection.set_timeblock_minutes(size + minutes);
                true
            }
            Some((i, span)) => match Interval::new(span.start(), span.end() + Duration::minutes(minutes)) {
                Ok(grown) => {
                    store.set_span(i, grown);
                    true
                }
                Err(_) => false,
            },
        }
    }

    /// Expand, then push the following event (and its followers) clear of the new end.
    pub fn push_expand_selection(&self, store: &mut EventStore, selection: &mut SelectionModel) -> bool {
        let changed = self.expand_selection(store, selection, 1);
        if let Some((i, end)) = selection.selected().and_then(|i| store.get(i).map(|e| (i, e.end()))) {
            self.push_down(store, i + 1, end);
        }
        changed
    }

    /// Nudge the selected event by [`SMALLEST_TIMEBLOCK`] minutes in `dir`, pushing
    /// neighbors out of the way.
    pub fn pushmove(&self, store: &mut EventStore, selection: &SelectionModel, dir: i32) -> bool {
        let Some((i, start)) = selection.selected().and_then(|i| store.get(i).map(|e| (i, e.start()))) else {
            return false;
        };
        let push_to = start + Duration::minutes(SMALLEST_TIMEBLOCK * dir as i64);
        let moved = if dir > 0 {
            self.push_down(store, i, push_to)
        } else {
            self.push_up(store, i, push_to)
        };
        moved > 0
    }

    /// Make room for a `timeblock_minutes` event directly below the selection.
    ///
    /// Every event overlapping `[end, end + block)` that starts at or after the
    /// selection's end is pushed down to `end + block`. With nothing selected the
    /// slot is simply the block after the cursor block.
    pub fn open_below(&self, store: &mut EventStore, selection: &SelectionModel, timeblock_minutes: i64) -> OpenSlot {
        let block = Duration::minutes(timeblock_minutes);
        let Some((index, end, calendar)) = selection
            .selected()
            .and_then(|i| store.get(i).map(|e| (i, e.end(), e.calendar())))
        else {
            let start = selection.cursor() + block;
            return OpenSlot {
                start,
                end: start + block,
                calendar: None,
            };
        };

        let push_to = end + block;
        let mut from = index + 1;
        while let Some(hit) = store.query_span(from, end, push_to, Some(end), None) {
            self.push_down(store, hit, push_to);
            from = hit + 1;
        }

        OpenSlot {
            start: end,
            end: push_to,
            calendar: Some(calendar),
        }
    }

    /// Move the selected event so it starts where the previous timed event ends.
    pub fn align_to_previous(&self, store: &mut EventStore, selection: &SelectionModel) -> bool {
        let Some(i) = selection.selected().filter(|&i| i < store.len()) else {
            return false;
        };
        let previous = (0..i).rev().find(|&j| !store.events()[j].is_all_day());
        match previous.map(|j| store.events()[j].end()) {
            Some(end) => {
                store.move_to(i, end);
                true
            }
            None => false,
        }
    }

    /// Move the selected event so it ends where the next timed event starts.
    pub fn align_to_next(&self, store: &mut EventStore, selection: &SelectionModel) -> bool {
        let Some(i) = selection.selected().filter(|&i| i < store.len()) else {
            return false;
        };
        let next = (i + 1..store.len()).find(|&j| !store.events()[j].is_all_day());
        match next.map(|j| store.events()[j].start()) {
            Some(start) => {
                let duration = store.events()[i].duration();
                store.move_to(i, start - duration);
                true
            }
            None => false,
        }
    }
}
