//! The scheduling session a host drives.
//!
//! One [`Engine`] owns the event store, the view, the selection, the drag gesture,
//! the command parser, and any in-progress edit. Hosts feed it input through the
//! `handle_*` methods (each returns whether a redraw is needed), paint what
//! [`Engine::layout`] returns, and periodically call [`Engine::persist`] to flush
//! save requests through a [`CalendarSource`].
//!
//! The store is re-sorted once at the end of every input, never in the middle of a
//! command. An event created by a command is therefore selected (and put into
//! edit mode) by that end-of-input refresh rather than by the command itself.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::calendar::{CalendarId, Event, EventId, EventKind, Interval, Rect, Rgba};
use crate::command::{Command, CommandDispatcher, Dispatch, Key};
use crate::config::EngineConfig;
use crate::drag::{DragController, Release};
use crate::edit::{EditBuffer, EditOutcome, EditSession};
use crate::error::{EngineError, Result};
use crate::geometry::{
    day_bounds, floor_hour, floor_to_block, format_duration, local_midnight, snap_to_block, GridLine, ViewConfig, Viewport,
    SMALLEST_TIMEBLOCK, ZOOM_STEP,
};
use crate::reschedule::Rescheduler;
use crate::selection::SelectionModel;
use crate::source::{CalendarSource, Clock, RawEvent};
use crate::store::EventStore;

/// One event as painted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutItem {
    pub id: EventId,
    pub index: usize,
    pub calendar: CalendarId,
    pub kind: EventKind,
    pub rect: Rect,
    pub summary: String,
    /// Duration label, e.g. `1h30m`.
    pub label: String,
    pub color: Rgba,
    pub highlighted: bool,
    pub dragging: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub viewport: Viewport,
    pub zoom: f64,
    pub items: Vec<LayoutItem>,
    /// The cursor block, drawn only when nothing is selected.
    pub selection_rect: Option<Rect>,
    /// The "now" line, when it is on screen.
    pub now_y: Option<f64>,
    pub grid: Vec<GridLine>,
}

pub struct Engine {
    config: EngineConfig,
    tz: Tz,
    clock: Box<dyn Clock>,
    store: EventStore,
    view: ViewConfig,
    selection: SelectionModel,
    drag: DragController,
    dispatcher: CommandDispatcher,
    rescheduler: Rescheduler,
    editing: Option<EditSession>,
    current_calendar: Option<CalendarId>,
    pending_saves: Vec<CalendarId>,
    viewport: Option<Viewport>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("events", &self.store.len())
            .field("selected", &self.selection.selected())
            .field("cursor", &self.selection.cursor())
            .field("editing", &self.editing.as_ref().map(|s| s.event))
            .finish()
    }
}

impl Engine {
    /// Start a session around the clock's current time: the reference day is the
    /// local day of "now", the cursor sits on the current hour, and the view starts
    /// `start_offset_hours` from it.
    pub fn new(config: EngineConfig, clock: Box<dyn Clock>) -> Result<Self> {
        let config = config.validate()?;
        let tz = config.tz()?;
        let now = clock.now();
        let today = local_midnight(now, tz);
        let hour = floor_hour(now, tz);
        let start_at = hour - today + Duration::hours(config.start_offset_hours);

        Ok(Self {
            view: ViewConfig::new(tz, today, start_at, config.zoom),
            selection: SelectionModel::new(hour, config.timeblock_minutes),
            drag: DragController::new(config.drag_threshold),
            dispatcher: CommandDispatcher::new(),
            rescheduler: Rescheduler::new(config.cascade_scope, tz),
            store: EventStore::new(),
            editing: None,
            current_calendar: None,
            pending_saves: Vec::new(),
            viewport: None,
            config,
            tz,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selection.selected().and_then(|i| self.store.get(i))
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Calendar new events go into.
    pub fn current_calendar(&self) -> Option<CalendarId> {
        self.current_calendar
    }

    pub fn pending_saves(&self) -> &[CalendarId] {
        &self.pending_saves
    }

    /// Add a calendar and its events. The first calendar loaded becomes the
    /// current one.
    pub fn load_calendar(
        &mut self,
        name: impl Into<String>,
        location: impl Into<PathBuf>,
        records: Vec<RawEvent>,
    ) -> Result<CalendarId> {
        // validate everything first so a bad record leaves the engine untouched
        let spans = records
            .iter()
            .map(|r| Interval::new(r.start, r.end))
            .collect::<Result<Vec<_>>>()?;

        let calendar = self.store.add_calendar(name, location);
        let count = records.len();
        for (record, span) in records.into_iter().zip(spans) {
            let kind = if record.all_day {
                EventKind::AllDay
            } else {
                EventKind::Timed
            };
            self.store
                .load(calendar, record.uid, kind, span, record.summary, record.properties)?;
        }
        self.current_calendar.get_or_insert(calendar);
        self.sync();
        debug!(?calendar, count, "loaded calendar");
        Ok(calendar)
    }

    /// Read `location` through `source` and load it.
    pub fn load_from(
        &mut self,
        source: &mut dyn CalendarSource,
        name: impl Into<String>,
        location: impl Into<PathBuf>,
    ) -> Result<CalendarId> {
        let location = location.into();
        let records = source.load(&location)?;
        self.load_calendar(name, location, records)
    }

    fn selected_id(&self) -> Option<EventId> {
        self.selected_event().map(|e| e.id())
    }

    /// The end-of-input refresh: sort, keep the selection on the same event, and
    /// turn a pending "select what was just inserted" into an inserting edit.
    fn sync(&mut self) {
        let selected = self.selected_id();
        match self.store.refresh() {
            Some(index) => {
                self.selection.select(&self.store, Some(index));
                self.begin_edit(true, true);
            }
            None => {
                let index = selected.and_then(|id| self.store.index_of(id));
                self.selection.reindex(index);
            }
        }
        self.selection.validate(&self.store);
        debug_assert!(self.store.is_sorted());
    }

    fn ensure_cursor_visible(&mut self) {
        let cursor = self.selection.cursor();
        if !self.view.time_in_view(cursor) {
            self.view.center_view(cursor);
        }
    }

    // ---- keyboard -------------------------------------------------------

    /// Keys typed during an edit go to the edit buffer, except Tab.
    fn is_edit_key(&self, key: Key) -> bool {
        self.editing.is_some() && key != Key::Tab
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        let changed = if self.is_edit_key(key) {
            self.handle_edit_key(key)
        } else {
            match self.dispatcher.feed(key) {
                Dispatch::Run { command, repeat } => {
                    self.run(command, repeat);
                    true
                }
                Dispatch::Pending(_) | Dispatch::Repeat(_) | Dispatch::Ignored => false,
            }
        };
        self.sync();
        changed
    }

    /// [`Engine::handle_key`] with a count the host already parsed.
    /// The count is dropped when the key goes to an open edit.
    pub fn handle_key_with_repeat(&mut self, key: Key, repeat: u32) -> bool {
        if !self.is_edit_key(key) {
            self.dispatcher.set_repeat(repeat);
        }
        self.handle_key(key)
    }

    /// Run a command directly, bypassing key parsing.
    pub fn run(&mut self, command: Command, repeat: u32) {
        debug!(?command, repeat, "run");
        for _ in 0..repeat.max(1) {
            self.execute(command);
        }
        if matches!(
            command,
            Command::MoveRelative(_) | Command::SelectRelative(_) | Command::CursorNow | Command::AlignHour
        ) {
            self.ensure_cursor_visible();
        }
    }

    fn execute(&mut self, command: Command) {
        let step = Duration::minutes(self.config.scroll_step_minutes);
        match command {
            Command::ScrollDown => self.view.scroll_by(step),
            Command::ScrollUp => self.view.scroll_by(-step),
            Command::SaveAll => {
                for i in 0..self.store.calendars().len() {
                    self.request_save(CalendarId(i));
                }
            }
            Command::NextCalendar => {
                self.next_calendar();
            }
            Command::Edit { clear } => {
                self.begin_edit(clear, false);
            }
            Command::Delete => self.delete_selected(),
            Command::DeleteTimeblock => self.delete_timeblock(),
            Command::CursorNow => self.move_now(),
            Command::EventNow => self.move_event_now(),
            Command::Nudge(dir) => self.nudge(dir),
            Command::PushMove(dir) => {
                self.rescheduler.pushmove(&mut self.store, &self.selection, dir);
            }
            Command::MoveRelative(rel) => self.selection.move_relative(&self.store, rel),
            Command::SelectRelative(rel) => self.selection.select_relative(&self.store, rel, 1),
            Command::Expand(sign) => {
                self.rescheduler
                    .expand_selection(&mut self.store, &mut self.selection, sign);
            }
            Command::PushExpand => {
                self.rescheduler
                    .push_expand_selection(&mut self.store, &mut self.selection);
            }
            Command::Insert => self.insert_at(self.selection.cursor()),
            Command::OpenBelow => self.open_below(),
            Command::ToggleCalendar(index) => {
                self.toggle_visibility(index);
            }
            Command::AlignHour => {
                let cursor = self.selection.cursor();
                self.selection.deselect(&self.store);
                self.selection.set_cursor(snap_to_block(cursor, self.tz, 60));
            }
            Command::AlignUp => {
                self.rescheduler.align_to_previous(&mut self.store, &self.selection);
            }
            Command::AlignDown => {
                self.rescheduler.align_to_next(&mut self.store, &self.selection);
            }
            Command::CenterView => self.view.center_view(self.selection.cursor()),
            Command::TopView => self.view.top_view(self.selection.cursor()),
            Command::BottomView => self.view.bottom_view(self.selection.cursor()),
            Command::ZoomIn => self.view.zoom_by(-ZOOM_STEP),
            Command::ZoomOut => self.view.zoom_by(ZOOM_STEP),
        }
    }

    fn nudge(&mut self, dir: i32) {
        let Some((i, start)) = self.selection.selected().zip(self.selected_event().map(|e| e.start())) else {
            return;
        };
        let delta = Duration::minutes(SMALLEST_TIMEBLOCK * dir as i64);
        self.store.move_to(i, start + delta);
    }

    fn now_block(&self) -> DateTime<Utc> {
        snap_to_block(self.clock.now(), self.tz, SMALLEST_TIMEBLOCK)
    }

    fn move_now(&mut self) {
        self.selection.select(&self.store, None);
        self.selection.set_cursor(self.now_block());
    }

    fn move_event_now(&mut self) {
        let now = self.now_block();
        if let Some(i) = self.selection.selected().filter(|&i| i < self.store.len()) {
            self.store.move_to(i, now);
            self.selection.set_cursor(now);
        }
    }

    // ---- calendars ------------------------------------------------------

    fn insertion_calendar(&self) -> Option<CalendarId> {
        self.current_calendar
            .filter(|c| self.store.calendar(*c).is_some())
            .or_else(|| self.store.calendars().first().map(|c| c.id()))
    }

    /// Advance the current calendar to the next visible one. While editing, the
    /// edited event moves along with it.
    pub fn next_calendar(&mut self) -> bool {
        let n = self.store.calendars().len();
        let Some(from) = self.insertion_calendar() else {
            return false;
        };
        let mut to = from.0;
        loop {
            to = (to + 1) % n;
            if to == from.0 || self.store.calendars()[to].visible {
                break;
            }
        }
        if to == from.0 {
            return false;
        }
        let to = CalendarId(to);
        self.current_calendar = Some(to);
        debug!(?from, ?to, "current calendar");

        if let Some(session) = &self.editing {
            if let Some(i) = self.store.index_of(session.event) {
                self.store.set_calendar(i, to);
            }
        }
        true
    }

    pub fn toggle_visibility(&mut self, index: usize) -> bool {
        let Some(calendar) = self.store.calendar_mut(CalendarId(index)) else {
            return false;
        };
        calendar.visible = !calendar.visible;
        debug!(index, visible = calendar.visible, "toggled calendar");

        let hidden = self
            .selection
            .selected()
            .is_some_and(|i| !self.store.is_visible(i));
        if hidden && self.editing.is_none() {
            self.selection.deselect(&self.store);
        }
        true
    }

    // ---- insert / delete ------------------------------------------------

    fn insert_span(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, calendar: Option<CalendarId>) {
        let Some(calendar) = calendar.or_else(|| self.insertion_calendar()) else {
            debug!(error = %EngineError::NoCalendarAvailable, "insert ignored");
            return;
        };
        if let Err(err) = self.store.insert(start, end, calendar) {
            warn!(%err, "insert failed");
        }
    }

    fn insert_at(&mut self, start: DateTime<Utc>) {
        let end = start + Duration::minutes(self.selection.timeblock_minutes());
        self.insert_span(start, end, None);
    }

    fn open_below(&mut self) {
        if self.insertion_calendar().is_none() {
            debug!(error = %EngineError::NoCalendarAvailable, "open below ignored");
            return;
        }
        let slot = self
            .rescheduler
            .open_below(&mut self.store, &self.selection, self.selection.timeblock_minutes());
        if let Some(calendar) = slot.calendar {
            self.current_calendar = Some(calendar);
        }
        self.insert_span(slot.start, slot.end, slot.calendar);
    }

    /// Remove an event, then select whatever now occupies the cursor block.
    fn delete_event(&mut self, id: EventId, hint: usize) {
        let Some(index) = self.store.index_of(id) else {
            return;
        };
        let selected = self.selected_id().filter(|s| *s != id);
        self.store.remove(index);
        self.drag.forget(id);
        if self.editing.as_ref().is_some_and(|s| s.event == id) {
            self.editing = None;
        }

        self.selection.reindex(selected.and_then(|s| self.store.index_of(s)));
        if selected.is_none() {
            let next = self.selection.closest_to_cursor(&self.store, hint);
            self.selection.select(&self.store, next);
        }
        debug!(?id, index, selected = ?self.selection.selected(), "deleted event");
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.delete_event(id, 0);
        }
    }

    /// Delete the selection and pull the rest of the day up into its place.
    fn delete_timeblock(&mut self) {
        let (start, end) = match self.selected_event() {
            Some(ev) => (ev.start(), ev.end()),
            None => (self.selection.cursor(), self.selection.selection_end()),
        };
        if let Some(id) = self.selected_id() {
            self.delete_event(id, 0);
        }
        self.rescheduler.close_gap(&mut self.store, start, end);

        self.selection.set_cursor(start);
        let hint = self.store.first_starting_at(start).unwrap_or(0);
        self.selection.reindex(None);
        let next = self.selection.closest_to_cursor(&self.store, hint);
        self.selection.select(&self.store, next);
    }

    // ---- editing --------------------------------------------------------

    fn begin_edit(&mut self, clear: bool, inserting: bool) -> bool {
        let Some(ev) = self.selected_event() else {
            debug!(error = %EngineError::EditWithoutSelection, "edit ignored");
            return false;
        };
        let buffer = if clear {
            EditBuffer::new()
        } else {
            EditBuffer::with_text(ev.summary.clone())
        };
        let session = EditSession::new(ev.id(), ev.calendar(), inserting, buffer);
        if let Some(previous) = self.editing.replace(session) {
            self.finish_edit(previous);
        }
        true
    }

    fn handle_edit_key(&mut self, key: Key) -> bool {
        let Some(session) = self.editing.as_mut() else {
            return false;
        };
        match session.feed(key) {
            EditOutcome::Continue(changed) => changed,
            EditOutcome::Commit => {
                if let Some(session) = self.editing.take() {
                    self.finish_edit(session);
                }
                true
            }
            EditOutcome::Cancel => {
                if let Some(session) = self.editing.take() {
                    self.cancel_edit(session);
                }
                true
            }
        }
    }

    fn finish_edit(&mut self, session: EditSession) {
        let Some(i) = self.store.index_of(session.event) else {
            warn!(event = ?session.event, "edited event vanished");
            return;
        };
        let Some(ev) = self.store.get_mut(i) else {
            return;
        };
        ev.summary = session.buffer.into_string();
        let calendar = ev.calendar();
        debug!(event = ?session.event, summary = %ev.summary, "committed edit");
        self.request_save(calendar);
        if calendar != session.origin {
            self.request_save(session.origin);
        }
    }

    fn cancel_edit(&mut self, session: EditSession) {
        if session.inserting {
            self.delete_event(session.event, 0);
        } else if let Some(i) = self.store.index_of(session.event) {
            // a Tab during the edit may have moved it
            self.store.set_calendar(i, session.origin);
        }
    }

    // ---- pointer --------------------------------------------------------

    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.drag.press(&mut self.store, x, y)
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        let block = self.selection.timeblock_minutes();
        self.drag
            .pointer_move(&mut self.store, &self.view, &viewport, self.tz, block, x, y)
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        let changed = match self.drag.release(&mut self.store, x, y) {
            Release::Dropped { event, start } => {
                debug!(?event, %start, "rescheduled by drag");
                true
            }
            Release::Click { target: Some(id), .. } => {
                let index = self.store.index_of(id);
                self.selection.select(&self.store, index);
                true
            }
            Release::Click { target: None, y, .. } => self.click_empty(y),
            Release::Ignored => false,
        };
        self.sync();
        changed
    }

    /// A click on empty timeline moves the cursor to the clicked slot and inserts
    /// there. Clicks in the all-day gutter do nothing.
    fn click_empty(&mut self, y: f64) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        if y < viewport.top {
            return false;
        }
        let at = self.view.y_to_time(&viewport, y);
        let slot = floor_to_block(at, self.tz, self.selection.timeblock_minutes());
        self.selection.select(&self.store, None);
        self.selection.set_cursor(slot);
        self.insert_at(slot);
        true
    }

    /// Scroll-wheel zoom. Positive deltas zoom out.
    pub fn handle_scroll(&mut self, delta: f64) -> bool {
        let before = self.view.zoom();
        self.view.zoom_by(delta);
        self.view.zoom() != before
    }

    // ---- layout ---------------------------------------------------------

    /// Compute every visible event's rectangle for a `width x height` area.
    ///
    /// Rectangles are written back onto the events so the next pointer press
    /// hit-tests against what was painted. A dragged event is drawn at its snapped
    /// drop time rather than at its stored start.
    pub fn layout(&mut self, width: f64, height: f64) -> Layout {
        self.sync();
        let viewport = Viewport::new(self.config.left_margin, self.config.gutter_height, width, height);
        self.viewport = Some(viewport);

        let view_start = self.view.view_start();
        let visible_end = self.view.visible_end();
        let (day_start, day_end) = day_bounds(view_start, self.tz);
        let selected = self.selection.selected();

        let all_day: Vec<usize> = (0..self.store.len())
            .filter(|&i| {
                let ev = &self.store.events()[i];
                ev.is_all_day() && self.store.is_visible(i) && ev.span().overlaps(day_start, day_end)
            })
            .collect();
        let column = viewport.width / all_day.len().max(1) as f64;

        let mut items = Vec::new();
        for i in 0..self.store.len() {
            if !self.store.is_visible(i) {
                continue;
            }
            let ev = &self.store.events()[i];
            let (rect, on_screen) = if ev.is_all_day() {
                match all_day.iter().position(|&j| j == i) {
                    Some(col) => (
                        Rect {
                            x: viewport.x + column * col as f64,
                            y: 0.0,
                            width: column,
                            height: viewport.top,
                        },
                        true,
                    ),
                    None => (Rect::default(), false),
                }
            } else {
                let start = ev.view.drag_time.unwrap_or(ev.start());
                let y = self.view.time_to_y(&viewport, start);
                let bottom = self.view.time_to_y(&viewport, start + ev.duration());
                let rect = Rect {
                    x: viewport.x,
                    y,
                    width: viewport.width,
                    height: bottom - y,
                };
                (rect, ev.end() >= view_start && start <= visible_end)
            };

            let color = self
                .store
                .calendar(ev.calendar())
                .map(|c| c.color)
                .unwrap_or(Rgba::for_calendar(ev.calendar().0));
            let item = on_screen.then(|| LayoutItem {
                id: ev.id(),
                index: i,
                calendar: ev.calendar(),
                kind: ev.kind(),
                rect,
                summary: ev.summary.clone(),
                label: format_duration(ev.duration().num_seconds()),
                color,
                highlighted: ev.view.highlighted,
                dragging: ev.view.dragging,
                selected: selected == Some(i),
            });
            if let Some(ev) = self.store.get_mut(i) {
                ev.view.rect = if on_screen { rect } else { Rect::default() };
            }
            items.extend(item);
        }

        let selection_rect = selected.is_none().then(|| {
            let cursor = self.selection.cursor();
            let y = self.view.time_to_y(&viewport, cursor);
            let bottom = self.view.time_to_y(&viewport, self.selection.selection_end());
            Rect {
                x: viewport.x,
                y,
                width: viewport.width,
                height: bottom - y,
            }
        });

        let now = self.clock.now();
        let now_y = self
            .view
            .time_in_view(now)
            .then(|| self.view.time_to_y(&viewport, now));

        trace!(items = items.len(), zoom = self.view.zoom(), "layout");
        Layout {
            viewport,
            zoom: self.view.zoom(),
            items,
            selection_rect,
            now_y,
            grid: self.view.grid_lines(&viewport),
        }
    }

    /// Visible events of the reference day, timed and all-day, in start order.
    pub fn agenda(&self) -> Vec<&Event> {
        let (start, end) = day_bounds(self.view.today, self.tz);
        (0..self.store.len())
            .filter(|&i| self.store.is_visible(i))
            .map(|i| &self.store.events()[i])
            .filter(|ev| ev.span().overlaps(start, end) || (ev.start() >= start && ev.start() < end))
            .collect()
    }

    // ---- persistence ----------------------------------------------------

    pub fn request_save(&mut self, calendar: CalendarId) {
        if !self.pending_saves.contains(&calendar) {
            debug!(?calendar, "save requested");
            self.pending_saves.push(calendar);
        }
    }

    /// The records storage should write for `calendar`.
    pub fn save_requested(&self, calendar: CalendarId) -> Vec<RawEvent> {
        self.store
            .calendar_events(calendar)
            .map(|ev| RawEvent {
                uid: ev.uid().to_string(),
                start: ev.start(),
                end: ev.end(),
                summary: ev.summary.clone(),
                all_day: ev.is_all_day(),
                properties: ev.properties.clone(),
            })
            .collect()
    }

    /// Write every calendar with a pending save through `source`. Returns how many
    /// were written; on failure the failed calendar and the rest stay queued.
    pub fn persist(&mut self, source: &mut dyn CalendarSource) -> Result<usize> {
        let mut written = 0;
        while let Some(&calendar) = self.pending_saves.first() {
            let location = self
                .store
                .calendar(calendar)
                .map(|c| c.location.clone())
                .ok_or(EngineError::UnknownCalendar(calendar))?;
            let records = self.save_requested(calendar);
            source.store(&location, &records)?;
            debug!(?calendar, location = %location.display(), events = records.len(), "saved calendar");
            self.pending_saves.remove(0);
            written += 1;
        }
        Ok(written)
    }
}
