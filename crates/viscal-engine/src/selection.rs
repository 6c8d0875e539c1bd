//! Selection and cursor navigation.
//!
//! Either one event is selected, or nothing is and the free-floating cursor (a start
//! time plus an implicit `timeblock` duration) marks where the next insertion goes.
//! Selecting an event snaps the cursor to its start, so deselecting leaves the cursor
//! where the selection was.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::store::EventStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unselected { cursor: DateTime<Utc> },
    Selected { index: usize },
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    selected: Option<usize>,
    cursor: DateTime<Utc>,
    timeblock_minutes: i64,
}

impl SelectionModel {
    pub fn new(cursor: DateTime<Utc>, timeblock_minutes: i64) -> Self {
        Self {
            selected: None,
            cursor,
            timeblock_minutes,
        }
    }

    pub fn state(&self) -> SelectionState {
        match self.selected {
            Some(index) => SelectionState::Selected { index },
            None => SelectionState::Unselected { cursor: self.cursor },
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: DateTime<Utc>) {
        self.cursor = cursor;
    }

    /// Duration of the free cursor, in minutes.
    pub fn timeblock_minutes(&self) -> i64 {
        self.timeblock_minutes
    }

    pub fn set_timeblock_minutes(&mut self, minutes: i64) {
        self.timeblock_minutes = minutes;
    }

    fn timeblock(&self) -> Duration {
        Duration::minutes(self.timeblock_minutes)
    }

    /// End of the cursor block.
    pub fn selection_end(&self) -> DateTime<Utc> {
        self.cursor + self.timeblock()
    }

    /// Length of whatever is selected: the event if there is one, else the cursor block.
    pub fn effective_timeblock(&self, store: &EventStore) -> i64 {
        self.selected
            .and_then(|i| store.get(i))
            .map(|e| e.minutes())
            .unwrap_or(self.timeblock_minutes)
    }

    /// Select `index` (snapping the cursor to the event's start), or clear the
    /// selection on `None`.
    pub fn select(&mut self, store: &EventStore, index: Option<usize>) {
        self.selected = index.filter(|&i| i < store.len());
        if let Some(ev) = self.selected.and_then(|i| store.get(i)) {
            self.cursor = ev.start();
        }
    }

    /// Back to the free cursor, parked at the start of what was selected.
    pub fn deselect(&mut self, store: &EventStore) {
        if let Some(ev) = self.selected.and_then(|i| store.get(i)) {
            self.cursor = ev.start();
        }
        self.selected = None;
    }

    /// Set the index directly, without touching the cursor. Used when a sort moved
    /// the selected event.
    pub(crate) fn reindex(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// Drop a selection that no longer points into the store.
    pub fn validate(&mut self, store: &EventStore) {
        if let Some(i) = self.selected {
            if i >= store.len() {
                warn!(index = i, len = store.len(), "stale selection cleared");
                self.selected = None;
            }
        }
    }

    /// The event to land on when stepping `rel` from the cursor with nothing selected:
    /// the last event ending at or before the cursor (`rel < 0`) or the one after it.
    pub fn closest_event(store: &EventStore, near: DateTime<Utc>, rel: i32) -> Option<usize> {
        let n = store.len();
        match n {
            0 => return None,
            1 => return Some(0),
            _ => {}
        }
        let up = rel < 0;
        for i in (0..n).rev() {
            if store.events()[i].end() <= near {
                let ind = if up { i } else { i + 1 };
                return (ind < n).then_some(ind);
            }
        }
        Some(0)
    }

    /// Nearest visible event at or beyond `from`, walking in the direction of `rel`.
    fn visible_from(store: &EventStore, from: usize, rel: i32) -> Option<usize> {
        if rel < 0 {
            (0..=from).rev().find(|&i| store.is_visible(i))
        } else {
            (from..store.len()).find(|&i| store.is_visible(i))
        }
    }

    /// Index one step `rel` away from the current selection (clamped to the store),
    /// or the closest event to the cursor when nothing is selected.
    pub fn relative_selection(&self, store: &EventStore, rel: i32) -> Option<usize> {
        if store.is_empty() {
            return None;
        }
        let last = store.len() - 1;
        match self.selected {
            None => Self::closest_event(store, self.cursor, rel)
                .and_then(|i| Self::visible_from(store, i, rel)),
            Some(current) => {
                let next = if rel < 0 {
                    current.saturating_sub(rel.unsigned_abs() as usize)
                } else {
                    (current + rel as usize).min(last)
                };
                Self::visible_from(store, next, rel).or(Some(current.min(last)))
            }
        }
    }

    /// Step the selection through the event list `repeat` times.
    pub fn select_relative(&mut self, store: &EventStore, rel: i32, repeat: u32) {
        for _ in 0..repeat.max(1) {
            let next = self.relative_selection(store, rel);
            self.select(store, next);
        }
        debug!(selected = ?self.selected, "select_relative");
    }

    /// Step through time slots rather than events.
    ///
    /// With nothing selected the cursor advances one timeblock; with an event selected
    /// the cursor jumps past its end (forward) or one timeblock before its start
    /// (backward). Whatever occupies the resulting slot becomes the selection, with
    /// the cursor snapped to its start; an empty slot clears the selection.
    pub fn move_relative(&mut self, store: &EventStore, rel: i32) {
        let block = self.timeblock();
        match self.selected.and_then(|i| store.get(i)) {
            None => self.cursor += block * rel,
            Some(ev) => {
                self.cursor = if rel > 0 { ev.end() } else { ev.start() - block };
            }
        }

        let hit = store.query_span(0, self.cursor, self.cursor + block, None, None);
        if let Some(ev) = hit.and_then(|i| store.get(i)) {
            self.cursor = ev.start();
        }
        self.selected = hit;
    }

    /// Whatever event occupies the effective block at the cursor, searching from
    /// just before `hint`.
    pub fn closest_to_cursor(&self, store: &EventStore, hint: usize) -> Option<usize> {
        let block = Duration::minutes(self.effective_timeblock(store));
        store.query_span(hint.saturating_sub(1), self.cursor, self.cursor + block, None, None)
    }
}
