pub mod grid;
pub mod hit;
pub mod nodes;
pub mod paint;

pub use grid::{GridDot, GridDots, GridHit, ORIGIN_LABEL, OriginMarker, grid_dots, nearest_dot, origin_marker};
pub use hit::{Hover, grid_at, hover_at, node_at};
pub use nodes::{NodeLayer, PageNode, ProjectedNode, label_size};
pub use paint::{DotKind, DrawCmd, paint_frame};
