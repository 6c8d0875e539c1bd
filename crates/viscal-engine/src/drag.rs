//! Pointer gestures: press, drag-to-reschedule, release, and hover.
//!
//! A press records the event under the pointer. Once the pointer travels further
//! than the drag threshold with the button held, the gesture becomes a drag: every
//! move converts the pointer back to a time, snaps it to the timeblock grid, and
//! stores it as the event's `drag_time`. The event's interval is left alone until
//! the button is released, so layout can draw the block on the grid line while the
//! pointer sits between lines. A release that never crossed the threshold is a click.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::EventId;
use crate::geometry::{snap_to_block, ViewConfig, Viewport};
use crate::store::EventStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    MouseDown {
        target: Option<EventId>,
        origin_y: f64,
    },
    Dragging {
        target: Option<EventId>,
        origin_y: f64,
    },
}

/// What a button release amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// A drag ended on an event; it now starts at `start`.
    Dropped { event: EventId, start: DateTime<Utc> },
    /// Press and release without dragging.
    Click { target: Option<EventId>, x: f64, y: f64 },
    /// Nothing to act on (no press, or a drag over empty space).
    Ignored,
}

/// Pointer glyph the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerGlyph {
    Default,
    Pointer,
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    threshold: f64,
    hovered: Option<EventId>,
}

/// First visible event whose last laid-out rectangle contains the point.
pub fn hit_test(store: &EventStore, x: f64, y: f64) -> Option<usize> {
    (0..store.len()).find(|&i| store.is_visible(i) && store.events()[i].view.rect.contains(x, y))
}

impl DragController {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: DragState::Idle,
            threshold,
            hovered: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn target(&self) -> Option<EventId> {
        match self.state {
            DragState::MouseDown { target, .. } | DragState::Dragging { target, .. } => target,
            DragState::Idle => None,
        }
    }

    pub fn target_index(&self, store: &EventStore) -> Option<usize> {
        self.target().and_then(|id| store.index_of(id))
    }

    pub fn pointer_glyph(&self) -> PointerGlyph {
        if self.hovered.is_some() {
            PointerGlyph::Pointer
        } else {
            PointerGlyph::Default
        }
    }

    pub fn press(&mut self, store: &mut EventStore, x: f64, y: f64) -> bool {
        let hit = hit_test(store, x, y);
        let target = hit.and_then(|i| store.get_mut(i)).map(|ev| {
            ev.view.drag_offset = ev.view.rect.y - y;
            ev.view.drag_time = None;
            ev.id()
        });
        self.state = DragState::MouseDown { target, origin_y: y };
        true
    }

    /// Track the pointer. Returns whether anything visible changed.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_move(
        &mut self,
        store: &mut EventStore,
        view: &ViewConfig,
        viewport: &Viewport,
        tz: Tz,
        timeblock_minutes: i64,
        x: f64,
        y: f64,
    ) -> bool {
        let mut changed = false;

        if let DragState::MouseDown { target, origin_y } = self.state {
            if (y - origin_y).abs() > self.threshold {
                debug!(?target, "drag started");
                self.state = DragState::Dragging { target, origin_y };
            }
        }

        if let DragState::Dragging { target: Some(id), .. } = self.state {
            if let Some(ev) = store.index_of(id).and_then(|i| store.get_mut(i)) {
                let candidate_y = y + ev.view.drag_offset;
                let at = view.y_to_time(viewport, candidate_y);
                ev.view.dragging = true;
                ev.view.drag_time = Some(snap_to_block(at, tz, timeblock_minutes));
                changed = true;
            }
        }

        changed | self.update_hover(store, x, y)
    }

    /// Re-run the hit test to toggle highlight flags, independent of any drag.
    fn update_hover(&mut self, store: &mut EventStore, x: f64, y: f64) -> bool {
        let mut hovered = None;
        for i in 0..store.len() {
            let visible = store.is_visible(i);
            let Some(ev) = store.get_mut(i) else { continue };
            ev.view.highlighted = visible && ev.view.rect.contains(x, y);
            if ev.view.highlighted && hovered.is_none() {
                hovered = Some(ev.id());
            }
        }
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    /// End the gesture. A drag over an event commits its snapped start, keeping
    /// the duration. A dropped all-day event lands on the timeline as a timed one.
    pub fn release(&mut self, store: &mut EventStore, x: f64, y: f64) -> Release {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let outcome = match state {
            DragState::Dragging { target: Some(id), .. } => {
                let index = store.index_of(id);
                let drop_at = index.and_then(|i| store.get(i)).and_then(|e| e.view.drag_time);
                match (index, drop_at) {
                    (Some(i), Some(start)) => {
                        if store.get(i).is_some_and(|e| e.is_all_day()) {
                            store.make_timed(i);
                        }
                        store.move_to(i, start);
                        debug!(?id, %start, "dropped event");
                        Release::Dropped { event: id, start }
                    }
                    _ => Release::Ignored,
                }
            }
            DragState::Dragging { target: None, .. } | DragState::Idle => Release::Ignored,
            DragState::MouseDown { target, .. } => Release::Click { target, x, y },
        };

        if let Some(ev) = state_target(state).and_then(|id| store.index_of(id)).and_then(|i| store.get_mut(i)) {
            ev.view.dragging = false;
            ev.view.drag_offset = 0.0;
            ev.view.drag_time = None;
        }
        outcome
    }

    /// Abandon any gesture without committing.
    pub fn cancel(&mut self, store: &mut EventStore) {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        if let Some(ev) = state_target(state).and_then(|id| store.index_of(id)).and_then(|i| store.get_mut(i)) {
            ev.view.dragging = false;
            ev.view.drag_time = None;
        }
    }

    /// Forget an event that was deleted mid-gesture.
    pub fn forget(&mut self, id: EventId) {
        match &mut self.state {
            DragState::MouseDown { target, .. } | DragState::Dragging { target, .. } => {
                if *target == Some(id) {
                    *target = None;
                }
            }
            DragState::Idle => {}
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }
}

fn state_target(state: DragState) -> Option<EventId> {
    match state {
        DragState::MouseDown { target, .. } | DragState::Dragging { target, .. } => target,
        DragState::Idle => None,
    }
}
