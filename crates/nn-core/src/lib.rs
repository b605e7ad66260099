pub mod config;
pub mod coords;
pub mod id;
pub mod model;
pub mod style;

pub use config::{CanvasConfig, ConfigError, GridConfig, NavbarConfig, ResizePolicy};
pub use coords::{CELL_UNITS, Projection, ViewState, to_logical, to_screen};
pub use id::{IdError, PageId};
pub use model::*;
pub use style::PageStyle;

// Re-export geometry types so downstream crates share one version
pub use kurbo::{Point, Rect, Size, Vec2};
