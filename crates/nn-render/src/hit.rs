//! Hit testing: screen point → page node or grid dot.
//!
//! Node hits walk the layer in reverse paint order (last painted = topmost).
//! Grid hits snap to the nearest visible dot within a pixel tolerance.

use crate::grid::{GridHit, nearest_dot};
use crate::nodes::NodeLayer;
use nn_core::{PageId, Point, ViewState};

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hover {
    Node(PageId),
    Grid(GridHit),
}

/// Find the topmost node whose label box contains `p`.
/// Returns `None` if no node is hit (background).
pub fn node_at(layer: &NodeLayer, view: &ViewState, p: Point) -> Option<PageId> {
    layer
        .iter()
        .rev()
        .find(|node| node.bounds(view).contains(p))
        .map(|node| node.id)
}

/// The grid dot under `p`, if one is within `tolerance` pixels.
pub fn grid_at(view: &ViewState, p: Point, tolerance: f64) -> Option<GridHit> {
    nearest_dot(view, p, tolerance)
}

/// Nodes take precedence over grid dots they cover.
pub fn hover_at(layer: &NodeLayer, view: &ViewState, p: Point, tolerance: f64) -> Option<Hover> {
    if let Some(id) = node_at(layer, view, p) {
        return Some(Hover::Node(id));
    }
    grid_at(view, p, tolerance).map(Hover::Grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_core::{LogicalPoint, Page, Size};

    fn layer_with(pages: &[(&str, &str, i32, i32)]) -> NodeLayer {
        let mut layer = NodeLayer::new();
        for (id, title, x, y) in pages {
            let page = Page::new(PageId::parse(id).unwrap(), *title);
            layer.insert(&page.at(LogicalPoint::new(*x, *y)));
        }
        layer
    }

    fn view() -> ViewState {
        ViewState::new(Size::new(800.0, 600.0), 50)
    }

    #[test]
    fn hit_inside_label_box() {
        let layer = layer_with(&[("aaaaaa", "Alpha", 100, 50)]);
        // Label top-left at (500, 250).
        assert_eq!(
            node_at(&layer, &view(), Point::new(505.0, 255.0)),
            PageId::parse("aaaaaa").ok()
        );
        assert_eq!(node_at(&layer, &view(), Point::new(495.0, 255.0)), None);
    }

    #[test]
    fn topmost_node_wins() {
        let layer = layer_with(&[("aaaaaa", "Under", 0, 0), ("bbbbbb", "Over", 0, 0)]);
        assert_eq!(
            node_at(&layer, &view(), Point::new(402.0, 302.0)),
            PageId::parse("bbbbbb").ok()
        );
    }

    #[test]
    fn grid_hover_off_node() {
        let layer = layer_with(&[("aaaaaa", "Alpha", 100, 50)]);
        let p = Point::new(351.0, 349.0);
        match hover_at(&layer, &view(), p, 6.0) {
            Some(Hover::Grid(hit)) => assert_eq!(hit.logical, LogicalPoint::new(-50, -50)),
            other => panic!("expected grid hover, got {other:?}"),
        }
        assert_eq!(node_at(&layer, &view(), p), None);
    }

    #[test]
    fn node_hover_over_grid_dot() {
        // The node's top-left corner sits exactly on a grid dot.
        let layer = layer_with(&[("aaaaaa", "Alpha", 100, 50)]);
        let p = Point::new(501.0, 251.0);
        assert_eq!(
            hover_at(&layer, &view(), p, 6.0),
            Some(Hover::Node(PageId::parse("aaaaaa").unwrap()))
        );
    }

    #[test]
    fn no_hover_between_dots() {
        let layer = NodeLayer::new();
        assert_eq!(hover_at(&layer, &view(), Point::new(425.0, 325.0), 6.0), None);
    }
}
