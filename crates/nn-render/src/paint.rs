//! Canvas state → toolkit-neutral draw commands.
//!
//! The host walks the list in order and paints it with whatever toolkit it
//! uses: grid dots first, then link edges, then the origin marker, then page
//! labels on top.

use crate::grid::{grid_dots, origin_marker};
use crate::nodes::NodeLayer;
use nn_core::{Link, PageId, Point, Rect, ViewState};

/// How a grid dot is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotKind {
    /// Small, dim.
    Grid,
    /// Larger and bright; sits under logical `(0, 0)`.
    Origin,
}

/// One paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Dot {
        at: Point,
        kind: DotKind,
    },
    Edge {
        from: Point,
        to: Point,
        style: String,
    },
    Text {
        at: Point,
        text: &'static str,
    },
    Label {
        id: PageId,
        bounds: Rect,
        title: String,
        /// CSS declaration list derived from the page style.
        css: String,
    },
}

/// Build the draw list for one frame.
///
/// Links whose endpoints are not both on the layer are skipped.
pub fn paint_frame(view: &ViewState, layer: &NodeLayer, links: &[Link]) -> Vec<DrawCmd> {
    let mut cmds: Vec<DrawCmd> = grid_dots(view)
        .map(|dot| DrawCmd::Dot {
            at: dot.point(),
            kind: if dot.origin {
                DotKind::Origin
            } else {
                DotKind::Grid
            },
        })
        .collect();

    for link in links {
        let (Some(from), Some(to)) = (
            layer.anchor_of(link.from, view),
            layer.anchor_of(link.to, view),
        ) else {
            log::trace!("skipping edge {} -> {}: endpoint not on canvas", link.from, link.to);
            continue;
        };
        cmds.push(DrawCmd::Edge {
            from,
            to,
            style: link.style.clone(),
        });
    }

    if let Some(marker) = origin_marker(view) {
        cmds.push(DrawCmd::Text {
            at: marker.position,
            text: marker.label,
        });
    }

    let visible = Rect::from_origin_size(Point::ZERO, view.size);
    for projected in layer.project(view) {
        if !touches(projected.bounds, visible) {
            continue;
        }
        cmds.push(DrawCmd::Label {
            id: projected.node.id,
            bounds: projected.bounds,
            title: projected.node.title.clone(),
            css: projected.node.style.to_css(),
        });
    }

    cmds
}

/// Closed-interval overlap; labels touching the viewport edge still paint.
fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
