//! End-to-end scenarios driven through the `Engine` input handlers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use viscal_engine::geometry::snap_to_block;
use viscal_engine::{
    CalendarId, CalendarSource, Engine, EngineConfig, EventKind, FixedClock, Key, RawEvent, Result,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Wall-clock time on 2026-03-02 in America/Vancouver (UTC-8).
fn local(hour: i64, min: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap() + Duration::hours(hour) + Duration::minutes(min)
}

fn raw(uid: &str, start: DateTime<Utc>, end: DateTime<Utc>, summary: &str) -> RawEvent {
    RawEvent {
        uid: uid.to_string(),
        start,
        end,
        summary: summary.to_string(),
        all_day: false,
        properties: vec![],
    }
}

/// An engine whose clock reads 09:10 local, with the view at 05:00-09:48.
fn engine_with(config: EngineConfig, events: Vec<RawEvent>) -> Engine {
    let mut engine = Engine::new(config, Box::new(FixedClock(local(9, 10)))).unwrap();
    engine.load_calendar("work", "work.ics", events).unwrap();
    engine
}

fn ab_engine() -> Engine {
    engine_with(
        EngineConfig::default(),
        vec![
            raw("a", local(9, 0), local(9, 30), "A"),
            raw("b", local(9, 30), local(10, 0), "B"),
        ],
    )
}

fn keys(engine: &mut Engine, script: &str) {
    for c in script.chars() {
        engine.handle_key(Key::Char(c));
    }
}

fn spans(engine: &Engine) -> Vec<(DateTime<Utc>, DateTime<Utc>, String)> {
    engine
        .store()
        .events()
        .iter()
        .map(|e| (e.start(), e.end(), e.summary.clone()))
        .collect()
}

#[derive(Default)]
struct MemorySource {
    stored: Vec<(PathBuf, Vec<RawEvent>)>,
}

impl CalendarSource for MemorySource {
    fn load(&mut self, _path: &Path) -> Result<Vec<RawEvent>> {
        Ok(vec![raw("m", local(11, 0), local(12, 0), "from memory")])
    }

    fn store(&mut self, path: &Path, records: &[RawEvent]) -> Result<()> {
        self.stored.push((path.to_path_buf(), records.to_vec()));
        Ok(())
    }
}

// ── Construction ────────────────────────────────────────────────────────────

#[test]
fn new_engine_starts_on_current_hour() {
    let engine = ab_engine();
    assert_eq!(engine.selection().cursor(), local(9, 0));
    assert_eq!(engine.view().view_start(), local(5, 0));
    assert_eq!(engine.current_calendar(), Some(CalendarId(0)));
    assert!(engine.selection().selected().is_none());
}

#[test]
fn load_rejects_reversed_record() {
    let mut engine = Engine::new(EngineConfig::default(), Box::new(FixedClock(local(9, 0)))).unwrap();
    let result = engine.load_calendar("bad", "bad.ics", vec![raw("x", local(10, 0), local(9, 0), "X")]);
    assert!(result.is_err());
}

#[test]
fn failed_load_leaves_engine_unchanged() {
    let mut engine = ab_engine();
    let result = engine.load_calendar(
        "bad",
        "bad.ics",
        vec![
            raw("x", local(9, 0), local(9, 30), "X"),
            raw("y", local(10, 0), local(9, 0), "Y"),
        ],
    );
    assert!(result.is_err());
    assert_eq!(engine.store().calendars().len(), 1);
    assert_eq!(engine.store().len(), 2);
    assert_eq!(engine.current_calendar(), Some(CalendarId(0)));
}

#[test]
fn load_from_source() {
    let mut engine = Engine::new(EngineConfig::default(), Box::new(FixedClock(local(9, 0)))).unwrap();
    let mut source = MemorySource::default();
    engine.load_from(&mut source, "mem", "mem.ics").unwrap();
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.store().calendars()[0].location, PathBuf::from("mem.ics"));
}

// ── Insertion and editing ───────────────────────────────────────────────────

#[test]
fn open_below_pushes_next_event_and_edits_new_one() {
    let mut engine = ab_engine();
    keys(&mut engine, "gj");
    assert_eq!(engine.selection().selected(), Some(0));

    keys(&mut engine, "o");
    assert_eq!(
        spans(&engine),
        vec![
            (local(9, 0), local(9, 30), "A".to_string()),
            (local(9, 30), local(10, 0), String::new()),
            (local(10, 0), local(10, 30), "B".to_string()),
        ]
    );
    assert_eq!(engine.selection().selected(), Some(1));
    assert!(engine.is_editing());
    assert!(engine.edit_session().unwrap().inserting);

    keys(&mut engine, "Lunch");
    engine.handle_key(Key::Enter);
    assert!(!engine.is_editing());
    assert_eq!(engine.store().get(1).unwrap().summary, "Lunch");
    assert_eq!(engine.pending_saves(), &[CalendarId(0)]);
}

#[test]
fn cancelling_an_insert_deletes_the_event() {
    let mut engine = ab_engine();
    keys(&mut engine, "i");
    assert_eq!(engine.store().len(), 3);
    assert!(engine.is_editing());

    keys(&mut engine, "oops");
    engine.handle_key(Key::Escape);
    assert_eq!(engine.store().len(), 2);
    assert!(!engine.is_editing());
    assert_eq!(engine.selection().selected(), Some(0));
}

#[test]
fn cancelling_a_plain_edit_keeps_summary() {
    let mut engine = ab_engine();
    keys(&mut engine, "gjA");
    assert_eq!(engine.edit_session().unwrap().buffer.as_str(), "A");
    engine.handle_key(Key::Backspace);
    keys(&mut engine, "Z");
    engine.handle_key(Key::Escape);
    assert_eq!(engine.store().get(0).unwrap().summary, "A");
    assert!(engine.pending_saves().is_empty());
}

#[test]
fn edit_keys_do_not_run_commands() {
    let mut engine = ab_engine();
    keys(&mut engine, "gjc");
    assert!(engine.is_editing());
    keys(&mut engine, "xdd");
    assert_eq!(engine.store().len(), 2);
    assert_eq!(engine.edit_session().unwrap().buffer.as_str(), "xdd");
    engine.handle_key(Key::Ctrl('w'));
    assert_eq!(engine.edit_session().unwrap().buffer.as_str(), "");
}

#[test]
fn edit_requires_selection() {
    let mut engine = ab_engine();
    keys(&mut engine, "A");
    assert!(!engine.is_editing());
    keys(&mut engine, "c");
    assert!(!engine.is_editing());
}

#[test]
fn insert_without_calendars_is_a_noop() {
    let mut engine = Engine::new(EngineConfig::default(), Box::new(FixedClock(local(9, 0)))).unwrap();
    assert!(engine.handle_key(Key::Char('i')));
    assert!(engine.store().is_empty());
    assert!(!engine.is_editing());
}

// ── Deletion ────────────────────────────────────────────────────────────────

#[test]
fn delete_clears_selection_when_slot_is_empty() {
    let mut engine = ab_engine();
    keys(&mut engine, "2gj");
    assert_eq!(engine.selection().selected(), Some(1));
    keys(&mut engine, "x");
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.selection().selected(), None);
    assert_eq!(engine.selection().cursor(), local(9, 30));
}

#[test]
fn delete_timeblock_pulls_rest_of_day_up() {
    let mut engine = engine_with(
        EngineConfig::default(),
        vec![
            raw("a", local(9, 0), local(9, 30), "A"),
            raw("b", local(9, 30), local(10, 0), "B"),
            raw("c", local(10, 0), local(11, 0), "C"),
            raw("d", local(33, 0), local(34, 0), "tomorrow"),
        ],
    );
    keys(&mut engine, "gjdd");
    assert_eq!(
        spans(&engine),
        vec![
            (local(9, 0), local(9, 30), "B".to_string()),
            (local(9, 30), local(10, 30), "C".to_string()),
            (local(33, 0), local(34, 0), "tomorrow".to_string()),
        ]
    );
    assert_eq!(engine.selection().selected(), Some(0));
}

#[test]
fn chord_miss_reparses_second_key() {
    let mut engine = ab_engine();
    keys(&mut engine, "gj");
    keys(&mut engine, "gx");
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.dispatcher().pending(), None);
}

// ── Moving ──────────────────────────────────────────────────────────────────

#[test]
fn repeat_count_multiplies_nudge() {
    let mut engine = ab_engine();
    keys(&mut engine, "gj3J");
    assert_eq!(engine.store().get(0).unwrap().start(), local(9, 15));
    assert_eq!(engine.store().get(0).unwrap().end(), local(9, 45));
    assert_eq!(engine.dispatcher().repeat(), 1);
}

#[test]
fn repeat_count_is_dropped_while_editing() {
    let mut engine = ab_engine();
    keys(&mut engine, "gjA");
    assert!(engine.handle_key_with_repeat(Key::Char('x'), 5));
    engine.handle_key(Key::Enter);
    assert_eq!(engine.store().get(0).unwrap().summary, "Ax");
    assert_eq!(engine.dispatcher().repeat(), 1);

    keys(&mut engine, "J");
    assert_eq!(engine.store().get(0).unwrap().start(), local(9, 5));
}

#[test]
fn pushmove_down_shoves_neighbor() {
    let mut engine = ab_engine();
    keys(&mut engine, "gj");
    engine.handle_key(Key::Ctrl('j'));
    assert_eq!(
        spans(&engine)
            .into_iter()
            .map(|(s, e, _)| (s, e))
            .collect::<Vec<_>>(),
        vec![(local(9, 5), local(9, 35)), (local(9, 35), local(10, 5))]
    );
}

#[test]
fn push_expand_grows_and_pushes() {
    let mut engine = ab_engine();
    keys(&mut engine, "gj");
    engine.handle_key(Key::Ctrl('v'));
    assert_eq!(engine.store().get(0).unwrap().end(), local(9, 35));
    assert_eq!(engine.store().get(1).unwrap().start(), local(9, 35));
}

#[test]
fn event_now_and_cursor_now() {
    let mut engine = ab_engine();
    keys(&mut engine, "gjT");
    assert_eq!(engine.store().get(0).unwrap().start(), local(9, 10));
    assert_eq!(engine.selection().selected(), Some(0));

    keys(&mut engine, "t");
    assert_eq!(engine.selection().selected(), None);
    assert_eq!(engine.selection().cursor(), local(9, 10));
}

#[test]
fn align_chords() {
    let mut engine = engine_with(
        EngineConfig::default(),
        vec![
            raw("a", local(8, 0), local(8, 30), "A"),
            raw("b", local(9, 0), local(9, 30), "B"),
        ],
    );
    keys(&mut engine, "2gjak");
    assert_eq!(engine.store().get(1).unwrap().start(), local(8, 30));

    keys(&mut engine, "gk");
    keys(&mut engine, "aj");
    assert_eq!(engine.store().get(0).unwrap().end(), local(8, 30));
    assert_eq!(engine.store().get(0).unwrap().start(), local(8, 0));
}

#[test]
fn move_relative_walks_slots() {
    let mut engine = ab_engine();
    keys(&mut engine, "j");
    assert_eq!(engine.selection().selected(), Some(1));
    keys(&mut engine, "j");
    assert_eq!(engine.selection().selected(), None);
    assert_eq!(engine.selection().cursor(), local(10, 0));
}

// ── Calendars ───────────────────────────────────────────────────────────────

#[test]
fn tab_while_editing_moves_event_between_calendars() {
    let mut engine = ab_engine();
    engine.load_calendar("home", "home.ics", vec![]).unwrap();
    keys(&mut engine, "gjA");
    engine.handle_key(Key::Tab);
    assert_eq!(engine.current_calendar(), Some(CalendarId(1)));
    assert_eq!(engine.store().get(0).unwrap().calendar(), CalendarId(1));
    assert!(engine.is_editing());

    engine.handle_key(Key::Enter);
    assert_eq!(engine.pending_saves(), &[CalendarId(1), CalendarId(0)]);
}

#[test]
fn tab_skips_hidden_calendars() {
    let mut engine = ab_engine();
    engine.load_calendar("home", "home.ics", vec![]).unwrap();
    engine.handle_key(Key::F(2));
    assert!(!engine.store().calendars()[1].visible);
    assert!(!engine.next_calendar());
    assert_eq!(engine.current_calendar(), Some(CalendarId(0)));
}

#[test]
fn hiding_a_calendar_drops_its_selection() {
    let mut engine = ab_engine();
    keys(&mut engine, "gj");
    engine.handle_key(Key::F(1));
    assert_eq!(engine.selection().selected(), None);
    assert!(engine.layout(618.0, 1000.0).items.is_empty());
    assert!(!engine.handle_key(Key::F(9)));
}

// ── View ────────────────────────────────────────────────────────────────────

#[test]
fn zoom_and_scroll_commands() {
    let mut engine = ab_engine();
    keys(&mut engine, "zi");
    assert!(engine.view().zoom() > 5.0);
    keys(&mut engine, "zozo");
    assert!(engine.view().zoom() < 5.0);

    let before = engine.view().view_start();
    engine.handle_key(Key::Ctrl('d'));
    assert_eq!(engine.view().view_start(), before + Duration::hours(1));
    engine.handle_key(Key::Ctrl('u'));
    assert_eq!(engine.view().view_start(), before);
}

#[test]
fn center_on_cursor_is_hour_aligned() {
    let mut engine = ab_engine();
    keys(&mut engine, "zz");
    let hours = engine.view().hours_in_view();
    assert_eq!(engine.view().view_start(), local(9 - hours / 2, 0));
    keys(&mut engine, "zt");
    assert_eq!(engine.view().view_start(), local(9, 0));
}

#[test]
fn navigating_out_of_view_recenters() {
    let mut engine = engine_with(
        EngineConfig::default(),
        vec![raw("late", local(20, 0), local(21, 0), "late")],
    );
    keys(&mut engine, "gj");
    assert_eq!(engine.selection().selected(), Some(0));
    assert!(engine.view().time_in_view(local(20, 0)));
}

// ── Pointer ─────────────────────────────────────────────────────────────────

#[test]
fn drag_snaps_to_timeblock_and_commits() {
    let config = EngineConfig {
        timeblock_minutes: 15,
        ..EngineConfig::default()
    };
    let mut engine = engine_with(config, vec![raw("a", local(9, 0), local(9, 30), "A")]);
    let layout = engine.layout(618.0, 1000.0);
    let rect = layout.items[0].rect;
    let per_minute = layout.viewport.height * layout.zoom / (24.0 * 60.0);

    let press_y = rect.y + 10.0;
    engine.handle_pointer_down(100.0, press_y);
    assert!(engine.handle_pointer_move(100.0, press_y + 47.0 * per_minute));
    assert!(engine.drag().is_dragging());

    let preview = engine.layout(618.0, 1000.0);
    let expected_y = engine.view().time_to_y(&preview.viewport, local(9, 45));
    assert!((preview.items[0].rect.y - expected_y).abs() < 1e-6);
    assert!(preview.items[0].dragging);

    assert!(engine.handle_pointer_up(100.0, press_y + 47.0 * per_minute));
    let ev = engine.store().get(0).unwrap();
    assert_eq!((ev.start(), ev.end()), (local(9, 45), local(10, 15)));
}

#[test]
fn dropping_all_day_event_makes_it_timed() {
    let mut all_day = raw("h", local(0, 0), local(24, 0), "holiday");
    all_day.all_day = true;
    let mut engine = engine_with(EngineConfig::default(), vec![all_day]);
    let layout = engine.layout(618.0, 1000.0);
    let rect = layout.items[0].rect;

    let (x, press_y) = (rect.x + 5.0, rect.y + 20.0);
    engine.handle_pointer_down(x, press_y);
    assert!(engine.handle_pointer_move(x, 300.0));
    assert!(engine.handle_pointer_up(x, 300.0));

    let expected = snap_to_block(
        engine.view().y_to_time(&layout.viewport, 300.0 - 20.0),
        engine.tz(),
        30,
    );
    let ev = engine.store().get(0).unwrap();
    assert_eq!(ev.kind(), EventKind::Timed);
    assert_eq!(ev.start(), expected);
    assert_eq!(ev.duration(), Duration::hours(24));
}

#[test]
fn click_on_event_selects_it() {
    let mut engine = ab_engine();
    let layout = engine.layout(618.0, 1000.0);
    let b = layout.items.iter().find(|i| i.summary == "B").unwrap().rect;
    engine.handle_pointer_down(b.x + 5.0, b.y + 5.0);
    engine.handle_pointer_move(b.x + 6.0, b.y + 6.0);
    assert!(engine.handle_pointer_up(b.x + 6.0, b.y + 6.0));
    assert_eq!(engine.selection().selected(), Some(1));
    assert_eq!(engine.store().len(), 2);
}

#[test]
fn click_on_empty_timeline_inserts_at_slot() {
    let mut engine = ab_engine();
    let layout = engine.layout(618.0, 1000.0);
    let y = engine.view().time_to_y(&layout.viewport, local(7, 20));
    engine.handle_pointer_down(100.0, y);
    assert!(engine.handle_pointer_up(100.0, y));
    assert!(engine.is_editing());
    let ev = engine.selected_event().unwrap();
    assert_eq!((ev.start(), ev.end()), (local(7, 0), local(7, 30)));
}

#[test]
fn click_in_gutter_does_nothing() {
    let mut engine = ab_engine();
    engine.layout(618.0, 1000.0);
    engine.handle_pointer_down(100.0, 20.0);
    assert!(!engine.handle_pointer_up(100.0, 20.0));
    assert_eq!(engine.store().len(), 2);
}

#[test]
fn scroll_wheel_zooms_within_bounds() {
    let mut engine = ab_engine();
    assert!(engine.handle_scroll(-1.0));
    for _ in 0..50 {
        engine.handle_scroll(5.0);
    }
    assert_eq!(engine.view().zoom(), 1.0);
    assert!(!engine.handle_scroll(5.0));
}

// ── Layout ──────────────────────────────────────────────────────────────────

#[test]
fn layout_reports_cursor_now_line_and_grid() {
    let mut engine = ab_engine();
    let layout = engine.layout(618.0, 1000.0);
    assert_eq!(layout.items.len(), 2);
    assert_eq!(layout.items[0].label, "30m");
    assert!(layout.selection_rect.is_some());
    let now_y = layout.now_y.unwrap();
    assert!((now_y - engine.view().time_to_y(&layout.viewport, local(9, 10))).abs() < 1e-6);
    assert!(!layout.grid.is_empty());

    keys(&mut engine, "gj");
    let layout = engine.layout(618.0, 1000.0);
    assert!(layout.selection_rect.is_none());
    assert!(layout.items[0].selected);
}

#[test]
fn all_day_events_sit_in_gutter() {
    let mut all_day = raw("h", local(0, 0), local(24, 0), "holiday");
    all_day.all_day = true;
    let mut engine = engine_with(EngineConfig::default(), vec![all_day]);
    let layout = engine.layout(618.0, 1000.0);
    assert_eq!(layout.items.len(), 1);
    assert_eq!(layout.items[0].rect.y, 0.0);
    assert_eq!(layout.items[0].rect.height, 40.0);
    assert_eq!(engine.agenda().len(), 1);
}

// ── Persistence ─────────────────────────────────────────────────────────────

#[test]
fn save_all_and_persist() {
    let mut engine = ab_engine();
    engine.load_calendar("home", "home.ics", vec![]).unwrap();
    engine.handle_key(Key::Ctrl('s'));
    assert_eq!(engine.pending_saves().len(), 2);

    let mut source = MemorySource::default();
    assert_eq!(engine.persist(&mut source).unwrap(), 2);
    assert!(engine.pending_saves().is_empty());
    assert_eq!(source.stored[0].0, PathBuf::from("work.ics"));
    assert_eq!(source.stored[0].1.len(), 2);
    assert_eq!(source.stored[0].1[0].uid, "a");
    assert!(source.stored[1].1.is_empty());
}
