//! Integration tests: logical ↔ screen mapping (nn-core).

use nn_core::{LogicalPoint, Point, Size, Vec2, ViewState, to_logical, to_screen};
use pretty_assertions::assert_eq;

const REFERENCE: Size = Size::new(800.0, 600.0);

#[test]
fn reference_scenario() {
    let screen = to_screen(LogicalPoint::new(100, 50), Vec2::ZERO, 50, REFERENCE);
    assert_eq!(screen, Point::new(500.0, 250.0));
    assert_eq!(
        to_logical(screen, Vec2::ZERO, 50, REFERENCE),
        LogicalPoint::new(100, 50)
    );
}

#[test]
fn round_trip_grid_of_views() {
    let pans = [Vec2::ZERO, Vec2::new(-250.0, 13.0), Vec2::new(0.5, -0.5)];
    let sizes = [REFERENCE, Size::new(333.0, 777.0), Size::new(1.0, 1.0)];
    for pan in pans {
        for size in sizes {
            for spacing in [10, 37, 50, 125, 200] {
                let projection = ViewState {
                    pan,
                    spacing,
                    size,
                }
                .projection();
                for x in (-1000..=1000).step_by(173) {
                    for y in (-1000..=1000).step_by(211) {
                        let p = LogicalPoint::new(x, y);
                        let back = projection.to_logical(projection.to_screen(p));
                        assert!(
                            (back.x - x).abs() <= 1 && (back.y - y).abs() <= 1,
                            "pan {pan:?} size {size:?} spacing {spacing}: {p:?} -> {back:?}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn positive_y_is_up() {
    let view = ViewState::new(REFERENCE, 50);
    let projection = view.projection();
    let up = projection.to_screen(LogicalPoint::new(0, 10));
    let down = projection.to_screen(LogicalPoint::new(0, -10));
    assert!(up.y < down.y);
}
