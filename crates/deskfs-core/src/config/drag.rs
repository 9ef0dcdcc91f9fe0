//! Pointer drag thresholds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Thresholds for the pointer drag state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Mouse travel (px) that turns a press into a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    /// Stationary hold time before a touch press becomes a drag.
    #[serde(default = "default_long_press")]
    pub long_press_ms: u64,
    /// Touch travel (px) that cancels the long press in favour of a marquee.
    #[serde(default = "default_long_press_tolerance")]
    pub long_press_tolerance_px: f64,
}

impl DragConfig {
    /// Long-press delay as a duration.
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: default_drag_threshold(),
            long_press_ms: default_long_press(),
            long_press_tolerance_px: default_long_press_tolerance(),
        }
    }
}

fn default_drag_threshold() -> f64 {
    5.0
}

fn default_long_press() -> u64 {
    500
}

fn default_long_press_tolerance() -> f64 {
    10.0
}
