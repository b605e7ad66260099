//! Viewport controller: owns pan offset, grid spacing and viewport size.
//!
//! ```text
//! Idle ──PointerDown(Left)──▶ Panning{last}
//! Panning ──PointerMove──▶ Panning{current}   pan += current - last
//! Panning ──PointerUp(Left)──▶ Idle
//! any ──Wheel(delta)──▶ same                  spacing ± zoom_step, clamped
//! any ──Resize(size)──▶ same                  pan per ResizePolicy
//! ```
//!
//! Every change to pan, spacing or size yields `[Reproject, Render]`.

use crate::input::{InputEvent, PointerButton};
use nn_core::{CanvasConfig, GridConfig, Point, ResizePolicy, Size, Vec2, ViewState};
use smallvec::{SmallVec, smallvec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanMode {
    Idle,
    Panning { last: Point },
}

/// What the host must do after a viewport transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Screen positions derived from the old view are invalid.
    Reproject,
    Render,
}

pub type Effects = SmallVec<[Effect; 2]>;

fn changed() -> Effects {
    smallvec![Effect::Reproject, Effect::Render]
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    view: ViewState,
    mode: PanMode,
    grid: GridConfig,
    resize_policy: ResizePolicy,
}

impl ViewportController {
    /// `config` is expected to be normalized.
    pub fn new(size: Size, config: &CanvasConfig) -> Self {
        Self {
            view: ViewState::new(size, config.grid.default_spacing),
            mode: PanMode::Idle,
            grid: config.grid,
            resize_policy: config.resize_policy,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn pan(&self) -> Vec2 {
        self.view.pan
    }

    pub fn spacing(&self) -> u32 {
        self.view.spacing
    }

    pub fn size(&self) -> Size {
        self.view.size
    }

    pub fn mode(&self) -> PanMode {
        self.mode
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.mode, PanMode::Panning { .. })
    }

    /// Drive the state machine with one input event.
    pub fn handle(&mut self, event: &InputEvent) -> Effects {
        match *event {
            InputEvent::PointerDown {
                at,
                button: PointerButton::Left,
            } => {
                self.begin_pan(at);
                Effects::new()
            }
            InputEvent::PointerMove { at } => self.drag_to(at),
            InputEvent::PointerUp {
                button: PointerButton::Left,
                ..
            } => {
                self.end_pan();
                Effects::new()
            }
            InputEvent::Wheel { delta } => self.wheel(delta),
            InputEvent::Resize { size } => self.resize(size),
            _ => Effects::new(),
        }
    }

    pub fn begin_pan(&mut self, at: Point) {
        log::debug!("pan start at ({}, {})", at.x, at.y);
        self.mode = PanMode::Panning { last: at };
    }

    /// Content follows the pointer. No-op unless panning.
    pub fn drag_to(&mut self, at: Point) -> Effects {
        let PanMode::Panning { last } = self.mode else {
            return Effects::new();
        };
        self.mode = PanMode::Panning { last: at };
        self.pan_by(at - last)
    }

    pub fn end_pan(&mut self) {
        if self.is_panning() {
            log::debug!("pan end, offset ({}, {})", self.view.pan.x, self.view.pan.y);
        }
        self.mode = PanMode::Idle;
    }

    pub fn pan_by(&mut self, delta: Vec2) -> Effects {
        if delta == Vec2::ZERO {
            return Effects::new();
        }
        log::trace!("pan by ({}, {})", delta.x, delta.y);
        self.view.pan += delta;
        changed()
    }

    /// One step per wheel notch direction; a zero delta is ignored.
    pub fn wheel(&mut self, delta: f64) -> Effects {
        if delta > 0.0 {
            self.zoom_by(1)
        } else if delta < 0.0 {
            self.zoom_by(-1)
        } else {
            Effects::new()
        }
    }

    /// Change spacing by `steps` zoom steps, clamped to the configured bounds.
    pub fn zoom_by(&mut self, steps: i32) -> Effects {
        let target = i64::from(self.view.spacing) + i64::from(steps) * i64::from(self.grid.zoom_step);
        let spacing = self.grid.clamp(target);
        if i64::from(spacing) != target {
            log::debug!("zoom clamped: requested {target}, using {spacing}");
        }
        self.set_spacing(spacing)
    }

    pub fn set_spacing(&mut self, spacing: u32) -> Effects {
        let spacing = self.grid.clamp(i64::from(spacing));
        if spacing == self.view.spacing {
            return Effects::new();
        }
        self.view.spacing = spacing;
        changed()
    }

    pub fn resize(&mut self, size: Size) -> Effects {
        if size == self.view.size {
            return Effects::new();
        }
        if self.resize_policy == ResizePolicy::KeepOrigin {
            let half = |s: Size| Vec2::new((s.width / 2.0).floor(), (s.height / 2.0).floor());
            self.view.pan += half(self.view.size) - half(size);
        }
        log::debug!(
            "resize {}x{} -> {}x{} ({:?})",
            self.view.size.width,
            self.view.size.height,
            size.width,
            size.height,
            self.resize_policy
        );
        self.view.size = size;
        changed()
    }

    /// Back to zero pan and the default spacing.
    pub fn reset(&mut self) -> Effects {
        self.mode = PanMode::Idle;
        let before = (self.view.pan, self.view.spacing);
        self.view.pan = Vec2::ZERO;
        self.view.spacing = self.grid.default_spacing;
        if before == (self.view.pan, self.view.spacing) {
            Effects::new()
        } else {
            changed()
        }
    }
}
