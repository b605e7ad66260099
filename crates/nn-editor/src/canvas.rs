//! The canvas controller a host embeds.
//!
//! Owns everything one canvas view needs: config, viewport, node layer,
//! links, navbar, and the pointer interaction state. All interaction from
//! the host goes through this struct. The only suspension point is
//! `load_book`; every other call is synchronous over in-memory state.

use crate::input::{InputEvent, PointerButton};
use crate::navbar::{Navbar, NavbarEffects, NavbarEvent, TimerToken};
use crate::viewport::{Effect, Effects, ViewportController};
use nn_core::{CanvasConfig, Link, LogicalPoint, Page, PageId, Point, Size, Vec2, ViewState};
use nn_render::{DrawCmd, Hover, NodeLayer, hover_at, node_at, paint_frame};
use nn_store::{GraphStore, LoadError};

/// What a host must do after feeding the canvas one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasResponse {
    /// The frame must be repainted.
    pub render: bool,
    pub navbar: NavbarEffects,
    /// A node drag finished at a new location; persist it.
    pub moved: Option<PageMoved>,
}

impl CanvasResponse {
    fn from_effects(effects: &Effects) -> Self {
        Self {
            render: effects.contains(&Effect::Render),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMoved {
    pub id: PageId,
    pub from: LogicalPoint,
    pub to: LogicalPoint,
}

/// Outcome of a successful book load.
#[derive(Debug)]
pub struct LoadSummary {
    pub book: String,
    pub pages: usize,
    pub links: usize,
    /// Page files and link records that could not be read.
    pub skipped: Vec<LoadError>,
}

/// A page being dragged: the pointer's offset from the label's top-left is
/// kept for the whole drag.
#[derive(Debug, Clone, Copy)]
struct NodeDrag {
    id: PageId,
    grab: Vec2,
    start: LogicalPoint,
}

#[derive(Debug)]
pub struct Canvas {
    config: CanvasConfig,
    viewport: ViewportController,
    layer: NodeLayer,
    links: Vec<Link>,
    book: Option<String>,
    navbar: Navbar,
    drag: Option<NodeDrag>,
    /// Last known pointer position, for hover queries.
    pointer: Option<Point>,
    last_clicked: Option<LogicalPoint>,
}

impl Canvas {
    pub fn new(size: Size, config: CanvasConfig) -> Self {
        let config = config.normalized();
        Self {
            viewport: ViewportController::new(size, &config),
            navbar: Navbar::new(config.navbar),
            config,
            layer: NodeLayer::new(),
            links: Vec::new(),
            book: None,
            drag: None,
            pointer: None,
            last_clicked: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        self.viewport.view()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn layer(&self) -> &NodeLayer {
        &self.layer
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    /// Name of the loaded book, if any.
    pub fn book(&self) -> Option<&str> {
        self.book.as_deref()
    }

    /// Logical point under the last press on empty canvas.
    pub fn last_clicked(&self) -> Option<LogicalPoint> {
        self.last_clicked
    }

    pub fn is_dragging_node(&self) -> bool {
        self.drag.is_some()
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    /// Replace the canvas contents with `name` from `store`.
    ///
    /// On failure the canvas is left empty and the error returned; the view
    /// itself stays usable.
    pub async fn load_book(
        &mut self,
        store: &GraphStore,
        name: &str,
    ) -> Result<LoadSummary, LoadError> {
        self.clear();
        let loaded = match store.load_book(name).await {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("could not load book '{name}', showing empty canvas: {e}");
                return Err(e);
            }
        };
        self.layer = NodeLayer::from_book(&loaded.book);
        self.links = loaded.book.links();
        self.book = Some(name.to_string());
        Ok(LoadSummary {
            book: name.to_string(),
            pages: self.layer.len(),
            links: self.links.len(),
            skipped: loaded.skipped,
        })
    }

    pub fn clear(&mut self) {
        self.layer.clear();
        self.links.clear();
        self.book = None;
        self.drag = None;
    }

    /// Add or refresh one page, e.g. after the host created it.
    pub fn add_page(&mut self, page: &Page) -> CanvasResponse {
        self.layer.insert(page);
        CanvasResponse {
            render: true,
            ..CanvasResponse::default()
        }
    }

    /// Add a link between two pages on the canvas. Unknown endpoints,
    /// self-links and duplicates are ignored.
    pub fn add_link(&mut self, link: Link) -> CanvasResponse {
        let known = self.layer.get(link.from).is_some() && self.layer.get(link.to).is_some();
        if !known || link.from == link.to || self.links.contains(&link) {
            return CanvasResponse::default();
        }
        self.links.push(link);
        CanvasResponse {
            render: true,
            ..CanvasResponse::default()
        }
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Dispatch a normalized input event.
    pub fn handle(&mut self, event: &InputEvent) -> CanvasResponse {
        match *event {
            InputEvent::PointerDown { at, button } => self.on_pointer_down(at, button),
            InputEvent::PointerMove { at } => self.on_pointer_move(at),
            InputEvent::PointerUp { at, button } => self.on_pointer_up(at, button),
            InputEvent::PointerLeave => self.on_pointer_leave(),
            InputEvent::Wheel { delta } => self.on_wheel(delta),
            InputEvent::Resize { size } => self.on_resize(size),
        }
    }

    pub fn on_resize(&mut self, size: Size) -> CanvasResponse {
        CanvasResponse::from_effects(&self.viewport.resize(size))
    }

    pub fn on_wheel(&mut self, delta: f64) -> CanvasResponse {
        CanvasResponse::from_effects(&self.viewport.wheel(delta))
    }

    pub fn on_pointer_down(&mut self, at: Point, button: PointerButton) -> CanvasResponse {
        self.pointer = Some(at);
        if button != PointerButton::Left {
            return CanvasResponse::default();
        }
        let view = *self.viewport.view();
        if let Some(id) = node_at(&self.layer, &view, at)
            && let Some(node) = self.layer.get(id)
        {
            let top_left = node.bounds(&view).origin();
            log::debug!("drag start on page {id}");
            self.drag = Some(NodeDrag {
                id,
                grab: at - top_left,
                start: node.location,
            });
            return CanvasResponse::default();
        }
        let clicked = view.projection().to_logical(at);
        log::debug!("canvas click at logical ({}, {})", clicked.x, clicked.y);
        self.last_clicked = Some(clicked);
        self.viewport.begin_pan(at);
        CanvasResponse::default()
    }

    pub fn on_pointer_move(&mut self, at: Point) -> CanvasResponse {
        let hover_before = self.hover();
        self.pointer = Some(at);

        let mut response = match self.drag {
            Some(drag) => {
                let location = self.view().projection().to_logical(at - drag.grab);
                let moved = self
                    .layer
                    .get(drag.id)
                    .is_some_and(|n| n.location != location);
                if moved {
                    self.layer.set_location(drag.id, location);
                }
                CanvasResponse {
                    render: moved,
                    ..CanvasResponse::default()
                }
            }
            None => CanvasResponse::from_effects(&self.viewport.drag_to(at)),
        };

        response.navbar = self.navbar.handle(NavbarEvent::PointerMoved { y: at.y });
        if self.hover() != hover_before {
            response.render = true;
        }
        response
    }

    pub fn on_pointer_up(&mut self, at: Point, button: PointerButton) -> CanvasResponse {
        self.pointer = Some(at);
        if button != PointerButton::Left {
            return CanvasResponse::default();
        }
        self.viewport.end_pan();
        let Some(drag) = self.drag.take() else {
            return CanvasResponse::default();
        };
        let Some(node) = self.layer.get(drag.id) else {
            return CanvasResponse::default();
        };
        if node.location == drag.start {
            return CanvasResponse::default();
        }
        log::info!(
            "page {} moved to ({}, {})",
            drag.id,
            node.location.x,
            node.location.y
        );
        CanvasResponse {
            moved: Some(PageMoved {
                id: drag.id,
                from: drag.start,
                to: node.location,
            }),
            ..CanvasResponse::default()
        }
    }

    pub fn on_pointer_leave(&mut self) -> CanvasResponse {
        let had_hover = self.hover().is_some();
        self.pointer = None;
        CanvasResponse {
            render: had_hover,
            navbar: self.navbar.handle(NavbarEvent::PointerLeft),
            moved: None,
        }
    }

    pub fn on_hide_timer(&mut self, token: TimerToken) -> CanvasResponse {
        let navbar = self.navbar.handle(NavbarEvent::HideTimerFired(token));
        CanvasResponse {
            render: !navbar.is_empty(),
            navbar,
            moved: None,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn query_logical_at(&self, at: Point) -> LogicalPoint {
        self.view().projection().to_logical(at)
    }

    pub fn query_node_at(&self, at: Point) -> Option<PageId> {
        node_at(&self.layer, self.view(), at)
    }

    /// What is under the pointer: a node, or a grid dot within tolerance.
    pub fn hover(&self) -> Option<Hover> {
        let at = self.pointer?;
        hover_at(&self.layer, self.view(), at, self.config.hover_tolerance)
    }

    /// Draw list for the current state.
    pub fn frame(&self) -> Vec<DrawCmd> {
        paint_frame(self.view(), &self.layer, &self.links)
    }
}
