//! Infinite dot grid.
//!
//! Dots are spaced `spacing` pixels apart and aligned so the logical origin
//! always sits exactly on a dot: the first column/row is the origin's screen
//! position taken modulo the spacing, never an absolute pixel position. Only
//! dots inside `[0, width] × [0, height]` are produced, lazily.

use nn_core::{CELL_UNITS, LogicalPoint, Point, ViewState};

/// Label drawn next to the origin dot.
pub const ORIGIN_LABEL: &str = "(0,0)";

/// One visible grid dot in integer screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDot {
    pub x: i64,
    pub y: i64,
    /// Set on the dot under logical `(0, 0)`; drawn larger and brighter.
    pub origin: bool,
}

impl GridDot {
    pub fn point(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// The origin dot and its label, when visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginMarker {
    pub position: Point,
    pub label: &'static str,
}

/// A grid dot near the pointer, with its logical coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHit {
    pub screen: Point,
    pub logical: LogicalPoint,
}

/// Integer grid geometry shared by the iterator and the queries below.
#[derive(Debug, Clone, Copy)]
struct Lattice {
    origin_x: i64,
    origin_y: i64,
    step: i64,
    width: i64,
    height: i64,
}

impl Lattice {
    fn of(view: &ViewState) -> Self {
        let origin = view.projection().origin();
        Self {
            origin_x: origin.x as i64,
            origin_y: origin.y as i64,
            step: i64::from(view.spacing.max(1)),
            width: view.size.width.floor() as i64,
            height: view.size.height.floor() as i64,
        }
    }

    fn in_view(&self, x: i64, y: i64) -> bool {
        (0..=self.width).contains(&x) && (0..=self.height).contains(&y)
    }
}

/// Lazy iterator over visible grid dots, row by row.
#[derive(Debug, Clone)]
pub struct GridDots {
    lattice: Lattice,
    start_x: i64,
    x: i64,
    y: i64,
}

impl Iterator for GridDots {
    type Item = GridDot;

    fn next(&mut self) -> Option<GridDot> {
        let l = &self.lattice;
        if self.start_x > l.width || self.y > l.height {
            return None;
        }
        if self.x > l.width {
            self.x = self.start_x;
            self.y += l.step;
            if self.y > l.height {
                return None;
            }
        }
        let dot = GridDot {
            x: self.x,
            y: self.y,
            origin: self.x == l.origin_x && self.y == l.origin_y,
        };
        self.x += l.step;
        Some(dot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let l = &self.lattice;
        if self.start_x > l.width || self.y > l.height {
            return (0, Some(0));
        }
        let cols = ((l.width - self.start_x) / l.step + 1) as usize;
        let rows_left = ((l.height - self.y) / l.step) as usize;
        let this_row = if self.x > l.width {
            0
        } else {
            ((l.width - self.x) / l.step + 1) as usize
        };
        let n = this_row + rows_left * cols;
        (n, Some(n))
    }
}

/// Visible grid dots for the current view.
pub fn grid_dots(view: &ViewState) -> GridDots {
    let lattice = Lattice::of(view);
    let start_x = lattice.origin_x.rem_euclid(lattice.step);
    let start_y = lattice.origin_y.rem_euclid(lattice.step);
    GridDots {
        lattice,
        start_x,
        x: start_x,
        y: start_y,
    }
}

/// The origin marker, if the logical origin is inside the viewport.
pub fn origin_marker(view: &ViewState) -> Option<OriginMarker> {
    let l = Lattice::of(view);
    l.in_view(l.origin_x, l.origin_y).then(|| OriginMarker {
        position: Point::new(l.origin_x as f64, l.origin_y as f64),
        label: ORIGIN_LABEL,
    })
}

/// The visible dot nearest to `p`, if it is within `tolerance` pixels.
pub fn nearest_dot(view: &ViewState, p: Point, tolerance: f64) -> Option<GridHit> {
    let l = Lattice::of(view);
    let step = l.step as f64;
    let kx = ((p.x - l.origin_x as f64) / step).round() as i64;
    let ky = ((p.y - l.origin_y as f64) / step).round() as i64;
    let x = kx.checked_mul(l.step)?.checked_add(l.origin_x)?;
    let y = ky.checked_mul(l.step)?.checked_add(l.origin_y)?;
    if !l.in_view(x, y) {
        return None;
    }
    let screen = Point::new(x as f64, y as f64);
    if screen.distance(p) > tolerance {
        return None;
    }
    // Dots far from the origin have no representable logical coordinate.
    let cells = |k: i64| {
        k.checked_mul(i64::from(CELL_UNITS))
            .and_then(|v| i32::try_from(v).ok())
    };
    Some(GridHit {
        screen,
        logical: LogicalPoint::new(cells(kx)?, cells(-ky)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_core::{Size, Vec2};
    use pretty_assertions::assert_eq;

    fn view(pan: (f64, f64), spacing: u32) -> ViewState {
        ViewState {
            pan: Vec2::new(pan.0, pan.1),
            spacing,
            size: Size::new(800.0, 600.0),
        }
    }

    #[test]
    fn dots_stay_inside_viewport() {
        let v = view((17.0, -23.0), 50);
        let dots: Vec<_> = grid_dots(&v).collect();
        assert!(!dots.is_empty());
        assert!(
            dots.iter()
                .all(|d| (0..=800).contains(&d.x) && (0..=600).contains(&d.y))
        );
    }

    #[test]
    fn origin_on_a_dot_for_any_pan() {
        for px in [-400.0, -75.0, -3.0, 0.0, 1.0, 49.0, 50.0, 333.0] {
            for py in [-299.0, -12.0, 0.0, 7.0, 260.0] {
                let v = view((px, py), 37);
                let marker = origin_marker(&v).expect("origin visible");
                let dots: Vec<_> = grid_dots(&v).filter(|d| d.origin).collect();
                assert_eq!(dots.len(), 1, "pan ({px}, {py})");
                assert_eq!(dots[0].point(), marker.position);
            }
        }
    }

    #[test]
    fn first_dot_is_origin_modulo_spacing() {
        let v = view((-130.0, 0.0), 50);
        // Origin at x = 270; 270 mod 50 = 20.
        let first = grid_dots(&v).next().unwrap();
        assert_eq!((first.x, first.y), (20, 0));
    }

    #[test]
    fn size_hint_matches_count() {
        let v = view((3.0, 4.0), 45);
        let mut dots = grid_dots(&v);
        assert_eq!(dots.size_hint().0, dots.clone().count());
        dots.next();
        dots.next();
        assert_eq!(dots.size_hint().0, dots.clone().count());
    }

    #[test]
    fn origin_marker_hidden_when_panned_away() {
        let v = view((1000.0, 0.0), 50);
        assert!(origin_marker(&v).is_none());
        assert!(grid_dots(&v).all(|d| !d.origin));
    }

    #[test]
    fn nearest_dot_within_tolerance() {
        let v = view((0.0, 0.0), 50);
        let hit = nearest_dot(&v, Point::new(502.0, 248.0), 6.0).unwrap();
        assert_eq!(hit.screen, Point::new(500.0, 250.0));
        assert_eq!(hit.logical, LogicalPoint::new(100, 50));
        assert!(nearest_dot(&v, Point::new(525.0, 275.0), 6.0).is_none());
    }

    #[test]
    fn nearest_dot_far_from_origin() {
        // Origin at x = 2^62: the dot at screen x = 0 is 2^58 cells away,
        // beyond any i64 logical coordinate.
        let v = ViewState {
            pan: Vec2::new((1u64 << 62) as f64, 0.0),
            spacing: 16,
            size: Size::new(800.0, 600.0),
        };
        let dot = grid_dots(&v).next().unwrap();
        assert_eq!((dot.x, dot.y), (0, 12));
        assert_eq!(nearest_dot(&v, dot.point(), 6.0), None);
    }

    #[test]
    fn degenerate_viewport() {
        let v = ViewState {
            pan: Vec2::ZERO,
            spacing: 50,
            size: Size::ZERO,
        };
        assert_eq!(grid_dots(&v).count(), 1);
        let v = ViewState {
            pan: Vec2::new(5.0, 5.0),
            ..v
        };
        assert_eq!(grid_dots(&v).count(), 0);
    }
}
