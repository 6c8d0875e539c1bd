//! Engine configuration.
//!
//! Every field has a default, so an empty TOML table is a valid config.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::geometry::{ZOOM_MAX, ZOOM_MIN};

/// How far a reschedule cascade may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeScope {
    /// Stop at the local day boundary of the event that starts the cascade.
    #[default]
    Day,
    /// Walk the whole sorted store.
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA zone every local-time operation (snapping, day bounds) runs in.
    pub timezone: String,
    /// Length of the cursor block and of newly inserted events.
    pub timeblock_minutes: i64,
    pub zoom: f64,
    /// Where the view starts relative to the current hour.
    pub start_offset_hours: i64,
    /// Height of the all-day strip above the timeline, in pixels.
    pub gutter_height: f64,
    /// Width of the hour-label margin left of the timeline, in pixels.
    pub left_margin: f64,
    /// Vertical pointer travel that turns a press into a drag.
    pub drag_threshold: f64,
    pub scroll_step_minutes: i64,
    pub cascade_scope: CascadeScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Vancouver".to_string(),
            timeblock_minutes: 30,
            zoom: 5.0,
            start_offset_hours: -4,
            gutter_height: 40.0,
            left_margin: 18.0,
            drag_threshold: 4.0,
            scroll_step_minutes: 60,
            cascade_scope: CascadeScope::Day,
        }
    }
}

impl EngineConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| EngineError::Config(format!("unknown timezone '{}'", self.timezone)))
    }

    /// Reject settings the engine cannot run with; clamp zoom into range.
    pub fn validate(mut self) -> Result<Self> {
        self.tz()?;
        if self.timeblock_minutes <= 0 {
            return Err(EngineError::Config(format!(
                "timeblock_minutes must be positive, got {}",
                self.timeblock_minutes
            )));
        }
        if self.drag_threshold < 0.0 {
            return Err(EngineError::Config("drag_threshold must not be negative".to_string()));
        }
        self.zoom = self.zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        Ok(self)
    }
}
