//! Coordinate engine: logical (persisted) ↔ screen (viewport pixel) mapping.
//!
//! Conventions:
//!
//! - The screen origin of logical `(0, 0)` is the viewport center plus the
//!   pan offset, rounded to a whole pixel so grid dots land on pixels.
//! - One grid cell spans [`CELL_UNITS`] logical units. The zoom scale is
//!   `spacing / CELL_UNITS`, so at the default spacing of 50 one logical unit
//!   is one pixel.
//! - Logical `y` grows upward; screen `y` grows downward.
//!
//! Every mapping is a pure function of the `ViewState`, so reprojecting after
//! any pan or zoom is exact and never accumulates rounding error.

use crate::model::LogicalPoint;
use kurbo::{Point, Size, Vec2};

/// Logical units per grid cell.
pub const CELL_UNITS: i32 = 50;

/// Transient viewport state owned by the viewport controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Accumulated drag translation in screen pixels.
    pub pan: Vec2,
    /// Pixels between adjacent grid dots; the zoom control.
    pub spacing: u32,
    /// Viewport size in pixels.
    pub size: Size,
}

impl ViewState {
    pub fn new(size: Size, spacing: u32) -> Self {
        Self {
            pan: Vec2::ZERO,
            spacing: spacing.max(1),
            size,
        }
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.pan, self.spacing, self.size)
    }

    /// Whether a screen point lies inside `[0, width] × [0, height]`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.size.width && p.y <= self.size.height
    }
}

/// A frozen logical ↔ screen mapping for one viewport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    origin: Point,
    scale: f64,
}

impl Projection {
    pub fn new(pan: Vec2, spacing: u32, size: Size) -> Self {
        let origin = Point::new(
            ((size.width / 2.0).floor() + pan.x).round(),
            ((size.height / 2.0).floor() + pan.y).round(),
        );
        Self {
            origin,
            scale: f64::from(spacing.max(1)) / f64::from(CELL_UNITS),
        }
    }

    /// Screen position of logical `(0, 0)`.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Pixels per logical unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_screen(&self, p: LogicalPoint) -> Point {
        Point::new(
            self.origin.x + f64::from(p.x) * self.scale,
            self.origin.y - f64::from(p.y) * self.scale,
        )
    }

    /// Nearest logical point to a screen position.
    pub fn to_logical(&self, p: Point) -> LogicalPoint {
        LogicalPoint {
            x: round_to_i32((p.x - self.origin.x) / self.scale),
            y: round_to_i32((self.origin.y - p.y) / self.scale),
        }
    }

    /// Logical coordinate of the grid cell corner nearest to a screen position.
    pub fn nearest_cell(&self, p: Point) -> LogicalPoint {
        let cell = f64::from(CELL_UNITS) * self.scale;
        LogicalPoint {
            x: round_to_i32((p.x - self.origin.x) / cell) * CELL_UNITS,
            y: round_to_i32((self.origin.y - p.y) / cell) * CELL_UNITS,
        }
    }
}

/// Project a logical point to the screen.
pub fn to_screen(logical: LogicalPoint, pan: Vec2, spacing: u32, size: Size) -> Point {
    Projection::new(pan, spacing, size).to_screen(logical)
}

/// Map a screen point back to the nearest logical point.
pub fn to_logical(screen: Point, pan: Vec2, spacing: u32, size: Size) -> LogicalPoint {
    Projection::new(pan, spacing, size).to_logical(screen)
}

fn round_to_i32(v: f64) -> i32 {
    // `as` saturates at the i32 bounds and maps NaN to 0.
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(800.0, 600.0);

    #[test]
    fn reference_projection() {
        let p = to_screen(LogicalPoint::new(100, 50), Vec2::ZERO, 50, VIEWPORT);
        assert_eq!(p, Point::new(500.0, 250.0));
    }

    #[test]
    fn origin_is_center_plus_pan() {
        let proj = Projection::new(Vec2::new(-30.0, 12.0), 50, VIEWPORT);
        assert_eq!(proj.origin(), Point::new(370.0, 312.0));
    }

    #[test]
    fn odd_sizes_floor_the_center() {
        let proj = Projection::new(Vec2::ZERO, 50, Size::new(801.0, 599.0));
        assert_eq!(proj.origin(), Point::new(400.0, 299.0));
    }

    #[test]
    fn y_axis_is_inverted() {
        let proj = Projection::new(Vec2::ZERO, 50, VIEWPORT);
        let up = proj.to_screen(LogicalPoint::new(0, 10));
        assert!(up.y < proj.origin().y);
    }

    #[test]
    fn spacing_scales_distance() {
        let p = to_screen(LogicalPoint::new(50, -50), Vec2::ZERO, 100, VIEWPORT);
        assert_eq!(p, Point::new(500.0, 400.0));
    }

    #[test]
    fn roundtrip_across_views() {
        let pans = [
            Vec2::ZERO,
            Vec2::new(13.0, -7.0),
            Vec2::new(-1234.5, 987.25),
        ];
        let sizes = [VIEWPORT, Size::new(1023.0, 77.0)];
        for pan in pans {
            for size in sizes {
                for spacing in [10, 37, 50, 200] {
                    for (x, y) in [(0, 0), (100, 50), (-731, 4002), (i32::from(i16::MAX), -9)] {
                        let lp = LogicalPoint::new(x, y);
                        let back = to_logical(to_screen(lp, pan, spacing, size), pan, spacing, size);
                        assert!(
                            (back.x - x).abs() <= 1 && (back.y - y).abs() <= 1,
                            "{lp:?} -> {back:?} at pan {pan:?} spacing {spacing}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn nearest_cell_snaps_to_cell_units() {
        let proj = Projection::new(Vec2::ZERO, 20, VIEWPORT);
        // 20px per cell; 2 cells right, 1 cell up, a few pixels off.
        let hit = proj.nearest_cell(Point::new(443.0, 278.0));
        assert_eq!(hit, LogicalPoint::new(2 * CELL_UNITS, CELL_UNITS));
    }

    #[test]
    fn zero_spacing_does_not_divide_by_zero() {
        let state = ViewState::new(VIEWPORT, 0);
        assert_eq!(state.spacing, 1);
        let lp = state.projection().to_logical(Point::new(0.0, 0.0));
        assert_eq!(lp, LogicalPoint::new(-20000, 15000));
    }
}
