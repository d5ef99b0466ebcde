//! Geometry clamp rules for drag, resize and creation.
//!
//! # Responsibility
//! - Correct proposed note geometry against the current viewport.
//! - Keep the anchor corner stationary while resizing.
//!
//! # Invariants
//! - Output width/height are never below `MIN_NOTE_SIZE`.
//! - Drag output keeps at least `VISIBLE_FRACTION` of each axis on screen.
//! - No function here panics, even when bounds invert.

use crate::model::note::{DEFAULT_NOTE_SIZE, MIN_NOTE_SIZE};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Share of a note's width/height that must stay inside the viewport.
pub const VISIBLE_FRACTION: f64 = 0.3;

/// Visible drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replaces negative or non-finite extents with zero.
    pub fn normalized(self) -> Self {
        Self {
            width: non_negative(self.width),
            height: non_negative(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Raises both extents to `MIN_NOTE_SIZE`.
    pub fn floored(self) -> Self {
        Self {
            width: floor_size(self.width),
            height: floor_size(self.height),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(DEFAULT_NOTE_SIZE, DEFAULT_NOTE_SIZE)
    }
}

/// Position plus size of one note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Corner handle grabbed to resize a note. The opposite corner is the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Se,
    Sw,
    Ne,
    Nw,
}

impl ResizeHandle {
    /// Whether dragging this handle moves the left edge.
    pub fn grows_left(self) -> bool {
        matches!(self, Self::Sw | Self::Nw)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn grows_up(self) -> bool {
        matches!(self, Self::Ne | Self::Nw)
    }
}

/// Snapshot taken when a resize gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeStart {
    pub mouse: Point,
    pub geometry: Geometry,
}

/// Allowed `[min, max]` position range on one axis under the partial
/// visibility policy.
pub fn drag_bounds(length: f64, viewport_length: f64) -> (f64, f64) {
    let partial = length * VISIBLE_FRACTION;
    (-(length - partial), viewport_length - partial)
}

/// Clamps a proposed drag position; size is left untouched.
pub fn clamp_drag(proposed: Point, size: Size, viewport: Viewport) -> Point {
    let (min_x, max_x) = drag_bounds(size.width, viewport.width);
    let (min_y, max_y) = drag_bounds(size.height, viewport.height);
    Point::new(
        clamp_axis(proposed.x, min_x, max_x),
        clamp_axis(proposed.y, min_y, max_y),
    )
}

/// Floors the size and drag-clamps the position of arbitrary geometry.
///
/// This is the rule the store re-applies after every update.
pub fn clamp_geometry(geometry: Geometry, viewport: Viewport) -> Geometry {
    let size = Size::new(geometry.width, geometry.height).floored();
    let position = clamp_drag(Point::new(geometry.x, geometry.y), size, viewport);
    Geometry::new(position.x, position.y, size.width, size.height)
}

/// Clamps a position so the whole note is inside the viewport.
///
/// Used for freshly created notes. When the viewport is smaller than the
/// note on an axis, the position on that axis collapses to zero.
pub fn clamp_fully_visible(proposed: Point, size: Size, viewport: Viewport) -> Point {
    let max_x = (viewport.width - size.width).max(0.0);
    let max_y = (viewport.height - size.height).max(0.0);
    Point::new(
        clamp_axis(proposed.x, 0.0, max_x),
        clamp_axis(proposed.y, 0.0, max_y),
    )
}

/// Computes the geometry for a resize gesture at the current mouse point.
pub fn clamp_resize(
    start: &ResizeStart,
    handle: ResizeHandle,
    mouse: Point,
    viewport: Viewport,
) -> Geometry {
    let initial = start.geometry;
    let delta_x = mouse.x - start.mouse.x;
    let delta_y = mouse.y - start.mouse.y;

    let (x, width) = resize_axis(
        initial.x,
        initial.width,
        delta_x,
        handle.grows_left(),
        viewport.width,
    );
    let (y, height) = resize_axis(
        initial.y,
        initial.height,
        delta_y,
        handle.grows_up(),
        viewport.height,
    );

    clamp_geometry(Geometry::new(x, y, width, height), viewport)
}

/// Resolves one axis of a resize: returns `(position, length)`.
///
/// When `grows_negative` the far edge (`start + length`) is the anchor,
/// otherwise the near edge (`start`) is.
fn resize_axis(
    start: f64,
    length: f64,
    delta: f64,
    grows_negative: bool,
    viewport_length: f64,
) -> (f64, f64) {
    let proposed = if grows_negative {
        length - delta
    } else {
        length + delta
    };
    let floored = floor_size(proposed);
    let hidden = 1.0 - VISIBLE_FRACTION;

    if grows_negative {
        let anchor = start + length;
        // Growing clips at the near edge: `anchor - len >= -(1 - f) * len`.
        // Shrinking stops at the far edge: `anchor - len <= vp - f * len`.
        let longest = anchor / VISIBLE_FRACTION;
        let shortest = (anchor - viewport_length) / hidden;
        let capped = floor_size(floored.max(shortest).min(longest));
        (anchor - capped, capped)
    } else {
        // Mirror image with `start` fixed.
        let longest = (viewport_length - start) / VISIBLE_FRACTION;
        let shortest = -start / hidden;
        let capped = floor_size(floored.max(shortest).min(longest));
        (start, capped)
    }
}

/// Picks a random position where a note of `size` is fully visible.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, size: Size, viewport: Viewport) -> Point {
    let max_x = viewport.width - size.width;
    let max_y = viewport.height - size.height;
    let x = if max_x > 0.0 {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    };
    let y = if max_y > 0.0 {
        rng.random_range(0.0..max_y)
    } else {
        0.0
    };
    Point::new(x, y)
}

/// Raises a length to `MIN_NOTE_SIZE`; NaN and infinities become the
/// minimum too.
pub fn floor_size(value: f64) -> f64 {
    if !value.is_finite() || value < MIN_NOTE_SIZE {
        MIN_NOTE_SIZE
    } else {
        value
    }
}

/// `f64::clamp` that tolerates `min > max` by preferring `min`.
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.min(max).max(min)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_axis, drag_bounds, floor_size, random_position, Point, Size, Viewport};

    #[test]
    fn drag_bounds_leave_thirty_percent_visible() {
        let (min, max) = drag_bounds(200.0, 1000.0);
        assert_eq!(min, -140.0);
        assert_eq!(max, 940.0);
    }

    #[test]
    fn clamp_axis_survives_inverted_bounds() {
        assert_eq!(clamp_axis(50.0, 10.0, 0.0), 10.0);
        assert_eq!(clamp_axis(f64::NAN, -5.0, 5.0), -5.0);
    }

    #[test]
    fn floor_size_replaces_small_and_non_finite_values() {
        assert_eq!(floor_size(10.0), 200.0);
        assert_eq!(floor_size(f64::NAN), 200.0);
        assert_eq!(floor_size(f64::INFINITY), 200.0);
        assert_eq!(floor_size(f64::NEG_INFINITY), 200.0);
        assert_eq!(floor_size(320.0), 320.0);
    }

    #[test]
    fn random_position_stays_fully_visible() {
        let mut rng = rand::rng();
        let viewport = Viewport::new(800.0, 600.0);
        for _ in 0..100 {
            let point = random_position(&mut rng, Size::default(), viewport);
            assert!(point.x >= 0.0 && point.x <= 600.0);
            assert!(point.y >= 0.0 && point.y <= 400.0);
        }
    }

    #[test]
    fn random_position_in_tiny_viewport_is_origin() {
        let mut rng = rand::rng();
        let point = random_position(&mut rng, Size::default(), Viewport::new(100.0, 50.0));
        assert_eq!(point, Point::new(0.0, 0.0));
    }
}
