//! Mapping between wall-clock time, normalized timeline location, and pixel Y.
//!
//! The visible window is one day long (`view_end = view_start + 24h`). A *location*
//! is `fraction * zoom`, where `fraction` is the position of a time inside the window.
//! Pixel Y is `location * height + top`, so the inverse divides by `height * zoom`.
//! That one normalization is used everywhere; the part of the window actually on
//! screen is locations `[0, 1]`, i.e. the first `24h / zoom`.
//!
//! Fractions and locations are never clamped: a dragged pointer above or below the
//! viewport maps to times outside the window.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

pub const DAY_SECONDS: i64 = 86_400;
pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 10.0;
/// Zoom delta applied by the keyboard zoom commands.
pub const ZOOM_STEP: f64 = 1.5;
/// Finest grid, in minutes, used by nudges, expand/shrink, and "now" rounding.
pub const SMALLEST_TIMEBLOCK: i64 = 5;

/// Half-hour grid sections shorter than this (in pixels) are not drawn.
const MIN_SECTION_HEIGHT: f64 = 14.0;

/// Position of `t` inside `[view_start, view_end]`, as a fraction of the window.
pub fn time_to_fraction(view_start: DateTime<Utc>, view_end: DateTime<Utc>, t: DateTime<Utc>) -> f64 {
    let span = (view_end - view_start).num_milliseconds() as f64;
    (t - view_start).num_milliseconds() as f64 / span
}

/// Exact inverse of [`time_to_fraction`], to the millisecond.
pub fn fraction_to_time(view_start: DateTime<Utc>, view_end: DateTime<Utc>, fraction: f64) -> DateTime<Utc> {
    let span = (view_end - view_start).num_milliseconds() as f64;
    view_start + Duration::milliseconds((fraction * span).round() as i64)
}

pub fn view_start(today: DateTime<Utc>, start_at: Duration, scroll: Duration) -> DateTime<Utc> {
    today + start_at + scroll
}

/// `zoom - amt * max(0.1, ln(zoom)) * 0.5`, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
///
/// The logarithm keeps perceived zoom speed roughly constant; the 0.1 floor keeps
/// steps non-zero at `zoom == 1`.
pub fn next_zoom(zoom: f64, amt: f64) -> f64 {
    let step = amt * zoom.ln().max(0.1) * 0.5;
    (zoom - step).clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Local midnight (in `tz`) of the day containing `t`.
pub fn local_midnight(t: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = t.with_timezone(&tz);
    tz.from_local_datetime(&local.date_naive().and_time(NaiveTime::MIN))
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| {
            let elapsed = local.num_seconds_from_midnight() as i64;
            t - Duration::seconds(elapsed) - Duration::nanoseconds(local.nanosecond() as i64)
        })
}

/// `[midnight, next midnight)` of the local day containing `t`.
pub fn day_bounds(t: DateTime<Utc>, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(t, tz);
    let end = local_midnight(start + Duration::hours(36), tz);
    (start, end)
}

/// Start of the local hour containing `t`.
pub fn floor_hour(t: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = t.with_timezone(&tz);
    let into_hour = local.minute() as i64 * 60 + local.second() as i64;
    t - Duration::seconds(into_hour) - Duration::nanoseconds(local.nanosecond() as i64)
}

/// Round the local minute-of-hour to the nearest multiple of `block_minutes`
/// (ties to even) and drop seconds. Removes the sub-minute jitter that repeated
/// float conversions leave behind.
pub fn snap_to_block(t: DateTime<Utc>, tz: Tz, block_minutes: i64) -> DateTime<Utc> {
    if block_minutes <= 0 {
        return t;
    }
    let minute = t.with_timezone(&tz).minute() as f64;
    let blocks = (minute / block_minutes as f64).round_ties_even() as i64;
    floor_hour(t, tz) + Duration::minutes(blocks * block_minutes)
}

/// Start of the `block_minutes` slot of the local hour that contains `t`.
pub fn floor_to_block(t: DateTime<Utc>, tz: Tz, block_minutes: i64) -> DateTime<Utc> {
    if block_minutes <= 0 {
        return t;
    }
    let minute = t.with_timezone(&tz).minute() as i64;
    floor_hour(t, tz) + Duration::minutes(minute / block_minutes * block_minutes)
}

/// Where the timeline is drawn inside the host's drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Left edge of the timeline (width of the hour-label margin).
    pub x: f64,
    /// Top edge of the timeline (height of the all-day gutter).
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Carve the timeline out of a `width x height` drawing area.
    pub fn new(left_margin: f64, gutter_height: f64, width: f64, height: f64) -> Self {
        Self {
            x: left_margin,
            top: gutter_height,
            width: (width - left_margin).max(0.0),
            height: (height - gutter_height).max(1.0),
        }
    }
}

/// The pan/zoom state of the day view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    tz: Tz,
    /// Local midnight of the reference day.
    pub today: DateTime<Utc>,
    /// Configured offset of the window from `today`.
    pub start_at: Duration,
    /// Pan offset added on top of `start_at`.
    pub scroll: Duration,
    zoom: f64,
}

impl ViewConfig {
    pub fn new(tz: Tz, today: DateTime<Utc>, start_at: Duration, zoom: f64) -> Self {
        Self {
            tz,
            today,
            start_at,
            scroll: Duration::zero(),
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
        }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Apply a signed zoom delta (scroll wheel or [`ZOOM_STEP`]); positive shrinks.
    pub fn zoom_by(&mut self, amt: f64) {
        self.zoom = next_zoom(self.zoom, amt);
    }

    pub fn view_start(&self) -> DateTime<Utc> {
        view_start(self.today, self.start_at, self.scroll)
    }

    pub fn view_end(&self) -> DateTime<Utc> {
        self.view_start() + Duration::seconds(DAY_SECONDS)
    }

    /// `fraction * zoom`; multiply by viewport height for pixels.
    pub fn time_to_location(&self, t: DateTime<Utc>) -> f64 {
        time_to_fraction(self.view_start(), self.view_end(), t) * self.zoom
    }

    pub fn location_to_time(&self, location: f64) -> DateTime<Utc> {
        fraction_to_time(self.view_start(), self.view_end(), location / self.zoom)
    }

    pub fn time_to_y(&self, viewport: &Viewport, t: DateTime<Utc>) -> f64 {
        self.time_to_location(t) * viewport.height + viewport.top
    }

    pub fn y_to_time(&self, viewport: &Viewport, y: f64) -> DateTime<Utc> {
        self.location_to_time((y - viewport.top) / viewport.height)
    }

    /// Last instant on screen.
    pub fn visible_end(&self) -> DateTime<Utc> {
        self.location_to_time(1.0)
    }

    pub fn time_in_view(&self, t: DateTime<Utc>) -> bool {
        t >= self.view_start() && t <= self.visible_end()
    }

    pub fn hours_in_view(&self) -> i64 {
        (self.visible_end() - self.view_start()).num_hours()
    }

    pub fn scroll_by(&mut self, delta: Duration) {
        self.scroll += delta;
    }

    /// Place the hour containing `anchor` `hours` hours below the top of the view.
    /// The grid is hour-aligned, so the window start always lands on an hour.
    pub fn relative_view(&mut self, anchor: DateTime<Utc>, hours: i64) {
        let anchor_hour = floor_hour(anchor, self.tz);
        self.start_at = anchor_hour - self.today - Duration::hours(hours);
        self.scroll = Duration::zero();
    }

    pub fn top_view(&mut self, anchor: DateTime<Utc>) {
        self.relative_view(anchor, 0);
    }

    pub fn bottom_view(&mut self, anchor: DateTime<Utc>) {
        let hours = self.hours_in_view() - 1;
        self.relative_view(anchor, hours);
    }

    pub fn center_view(&mut self, anchor: DateTime<Utc>) {
        let hours = self.hours_in_view() / 2;
        self.relative_view(anchor, hours);
    }

    /// Half-hour grid lines across the window. Hour lines are always present;
    /// half-hour lines only when a section is tall enough to read.
    pub fn grid_lines(&self, viewport: &Viewport) -> Vec<GridLine> {
        let section_height = viewport.height / 48.0 * self.zoom;
        let first = floor_hour(self.view_start(), self.tz);

        (0..48)
            .filter_map(|section| {
                let on_hour = section % 2 == 0;
                if section_height < MIN_SECTION_HEIGHT && !on_hour {
                    return None;
                }
                let t = first + Duration::minutes(section * 30);
                let hour = t.with_timezone(&self.tz).hour();
                Some(GridLine {
                    y: self.time_to_y(viewport, t),
                    hour: on_hour.then_some(hour),
                    day_boundary: on_hour && hour == 0,
                    dashed: !on_hour,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub y: f64,
    /// Local hour label for on-the-hour lines.
    pub hour: Option<u32>,
    pub day_boundary: bool,
    pub dashed: bool,
}

/// Compact duration label: `45s`, `2h`, `30m`, `1h30m`.
pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds - hours * 3600) / 60;
    let secs = seconds - hours * 3600 - minutes * 60;
    match (hours, minutes) {
        (0, 0) => format!("{}s", secs),
        (h, 0) => format!("{}h", h),
        (0, m) => format!("{}m", m),
        (h, m) => format!("{}h{}m", h, m),
    }
}
