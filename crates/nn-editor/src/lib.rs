pub mod canvas;
pub mod input;
pub mod navbar;
pub mod viewport;

pub use canvas::{Canvas, CanvasResponse, LoadSummary, PageMoved};
pub use input::{InputEvent, PointerButton};
pub use navbar::{Navbar, NavbarAnimation, NavbarEffect, NavbarEvent, NavbarState, TimerToken};
pub use viewport::{Effect, Effects, PanMode, ViewportController};
