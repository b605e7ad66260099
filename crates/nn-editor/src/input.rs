//! Input abstraction layer.
//!
//! Hosts translate their toolkit's mouse, wheel and window events into
//! `InputEvent`s in screen pixels (origin top-left, y down).

use nn_core::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// A normalized input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { at: Point, button: PointerButton },
    PointerMove { at: Point },
    PointerUp { at: Point, button: PointerButton },
    /// Pointer left the canvas widget.
    PointerLeave,
    /// Wheel notches; positive zooms in.
    Wheel { delta: f64 },
    Resize { size: Size },
}

impl InputEvent {
    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { at, .. } | Self::PointerMove { at } | Self::PointerUp { at, .. } => {
                Some(*at)
            }
            _ => None,
        }
    }
}
