//! Board runtime configuration.
//!
//! # Invariants
//! - `normalized()` output always has a finite, non-negative viewport and a
//!   save debounce inside `MIN_SAVE_DEBOUNCE_MS..=MAX_SAVE_DEBOUNCE_MS`.

use crate::interaction::trash::TrashZone;
use crate::layout::clamp::Viewport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 500;
const MIN_SAVE_DEBOUNCE_MS: u64 = 50;
const MAX_SAVE_DEBOUNCE_MS: u64 = 10_000;
const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Viewport used until the host reports its real size.
    pub viewport: Viewport,
    /// Quiet period after the last change before the board is written back.
    pub save_debounce_ms: u64,
    pub trash: TrashZone,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            trash: TrashZone::default(),
        }
    }
}

impl BoardConfig {
    /// Returns a copy with out-of-range values pulled back into range.
    pub fn normalized(mut self) -> Self {
        self.viewport = self.viewport.normalized();
        self.save_debounce_ms = self
            .save_debounce_ms
            .clamp(MIN_SAVE_DEBOUNCE_MS, MAX_SAVE_DEBOUNCE_MS);
        if !(self.trash.width.is_finite() && self.trash.width >= 0.0) {
            self.trash.width = TrashZone::default().width;
        }
        if !(self.trash.height.is_finite() && self.trash.height >= 0.0) {
            self.trash.height = TrashZone::default().height;
        }
        self
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::BoardConfig;
    use crate::layout::clamp::Viewport;

    #[test]
    fn normalized_clamps_debounce_and_viewport() {
        let config = BoardConfig {
            viewport: Viewport::new(-10.0, f64::NAN),
            save_debounce_ms: 1,
            ..BoardConfig::default()
        }
        .normalized();
        assert_eq!(config.viewport, Viewport::new(0.0, 0.0));
        assert_eq!(config.save_debounce_ms, 50);

        let slow = BoardConfig {
            save_debounce_ms: 60_000,
            ..BoardConfig::default()
        }
        .normalized();
        assert_eq!(slow.save_debounce_ms, 10_000);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"save_debounce_ms": 750}"#).unwrap();
        assert_eq!(config.save_debounce_ms, 750);
        assert_eq!(config.viewport, BoardConfig::default().viewport);
    }
}
