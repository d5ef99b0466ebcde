//! Drop target that deletes notes.

use crate::layout::clamp::{Geometry, Point, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrashCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Trash area anchored to one viewport corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrashZone {
    pub corner: TrashCorner,
    pub width: f64,
    pub height: f64,
}

impl Default for TrashZone {
    fn default() -> Self {
        Self {
            corner: TrashCorner::BottomRight,
            width: 120.0,
            height: 120.0,
        }
    }
}

impl TrashZone {
    /// Area covered by the zone in the given viewport.
    pub fn area(&self, viewport: Viewport) -> Geometry {
        let x = match self.corner {
            TrashCorner::TopLeft | TrashCorner::BottomLeft => 0.0,
            TrashCorner::TopRight | TrashCorner::BottomRight => viewport.width - self.width,
        };
        let y = match self.corner {
            TrashCorner::TopLeft | TrashCorner::TopRight => 0.0,
            TrashCorner::BottomLeft | TrashCorner::BottomRight => viewport.height - self.height,
        };
        Geometry::new(x, y, self.width, self.height)
    }

    /// Inclusive hit test for a pointer position.
    pub fn contains(&self, viewport: Viewport, point: Point) -> bool {
        let area = self.area(viewport);
        point.x >= area.x && point.x <= area.right() && point.y >= area.y && point.y <= area.bottom()
    }
}
