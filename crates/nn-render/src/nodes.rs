//! Node layer: page labels placed on the canvas.
//!
//! The layer keeps each page's logical location and label size. Screen
//! positions are never stored; they are projected from the current
//! `ViewState` on every query, so a pan or zoom can never leave a node at a
//! stale position and repeated pans never accumulate rounding drift.

use nn_core::{Book, LogicalPoint, Page, PageId, PageStyle, Point, Rect, Size, ViewState};
use std::collections::HashMap;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_EM: f64 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_EM: f64 = 1.2;

/// A page as the canvas sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub id: PageId,
    pub title: String,
    /// Authoritative position; screen position derives from it.
    pub location: LogicalPoint,
    pub style: PageStyle,
    /// Label box size in pixels.
    pub size: Size,
}

impl PageNode {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id(),
            title: page.title.clone(),
            location: page.location,
            style: page.style.clone(),
            size: label_size(&page.title, &page.style),
        }
    }

    /// Screen-space label box: top-left corner at the projected location.
    pub fn bounds(&self, view: &ViewState) -> Rect {
        let anchor = view.projection().to_screen(self.location);
        Rect::from_origin_size(anchor, self.size)
    }
}

/// A node together with its bounds for one view.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedNode<'a> {
    pub node: &'a PageNode,
    pub bounds: Rect,
}

/// Estimate the label box for a title rendered with `style`.
pub fn label_size(title: &str, style: &PageStyle) -> Size {
    let font = style.font_size_px();
    let chrome = 2.0 * (style.padding_px() + style.border_width_px());
    let chars = title.chars().count().max(1) as f64;
    Size::new(
        chars * GLYPH_WIDTH_EM * font + chrome,
        LINE_HEIGHT_EM * font + chrome,
    )
}

/// Page nodes in paint order (later entries are drawn on top).
#[derive(Debug, Clone, Default)]
pub struct NodeLayer {
    nodes: Vec<PageNode>,
    index: HashMap<PageId, usize>,
}

impl NodeLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every page of `book` in book order.
    pub fn from_book(book: &Book) -> Self {
        let mut layer = Self::new();
        for page in book.pages() {
            layer.insert(page);
        }
        layer
    }

    /// Add a page, or refresh it in place if already present.
    pub fn insert(&mut self, page: &Page) {
        let node = PageNode::from_page(page);
        match self.index.get(&node.id) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.index.insert(node.id, self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub fn remove(&mut self, id: PageId) -> Option<PageNode> {
        let i = self.index.remove(&id)?;
        let node = self.nodes.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(node)
    }

    /// Move a node to a new logical location. Returns false if unknown.
    pub fn set_location(&mut self, id: PageId, location: LogicalPoint) -> bool {
        match self.index.get(&id) {
            Some(&i) => {
                self.nodes[i].location = location;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: PageId) -> Option<&PageNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PageNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    pub fn bounds_of(&self, id: PageId, view: &ViewState) -> Option<Rect> {
        self.get(id).map(|n| n.bounds(view))
    }

    /// Label center, used as the edge endpoint.
    pub fn anchor_of(&self, id: PageId, view: &ViewState) -> Option<Point> {
        self.bounds_of(id, view).map(|b| b.center())
    }

    /// Every node with its bounds for `view`, in paint order.
    pub fn project<'a>(
        &'a self,
        view: &ViewState,
    ) -> impl Iterator<Item = ProjectedNode<'a>> + use<'a> {
        let projection = view.projection();
        self.nodes.iter().map(move |node| ProjectedNode {
            node,
            bounds: Rect::from_origin_size(projection.to_screen(node.location), node.size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_core::Vec2;
    use pretty_assertions::assert_eq;

    fn page(id: &str, title: &str, x: i32, y: i32) -> Page {
        Page::new(PageId::parse(id).unwrap(), title).at(LogicalPoint::new(x, y))
    }

    fn view() -> ViewState {
        ViewState::new(Size::new(800.0, 600.0), 50)
    }

    #[test]
    fn label_size_from_style() {
        let style = PageStyle::default(); // 12px font, 2px padding, no border
        let size = label_size("abcde", &style);
        assert_eq!(size, Size::new(5.0 * 0.6 * 12.0 + 4.0, 1.2 * 12.0 + 4.0));
    }

    #[test]
    fn node_anchored_at_projected_location() {
        let mut layer = NodeLayer::new();
        layer.insert(&page("aaaaaa", "Alpha", 100, 50));
        let b = layer.bounds_of(PageId::parse("aaaaaa").unwrap(), &view()).unwrap();
        assert_eq!(b.origin(), Point::new(500.0, 250.0));
    }

    #[test]
    fn reprojection_follows_pan_without_drift() {
        let mut layer = NodeLayer::new();
        layer.insert(&page("aaaaaa", "Alpha", -37, 81));
        let id = PageId::parse("aaaaaa").unwrap();
        let mut v = view();
        let before = layer.bounds_of(id, &v).unwrap();
        for _ in 0..1000 {
            v.pan += Vec2::new(3.0, -7.0);
        }
        for _ in 0..1000 {
            v.pan -= Vec2::new(3.0, -7.0);
        }
        assert_eq!(layer.bounds_of(id, &v).unwrap(), before);
    }

    #[test]
    fn insert_replaces_existing() {
        let mut layer = NodeLayer::new();
        layer.insert(&page("aaaaaa", "Alpha", 0, 0));
        layer.insert(&page("aaaaaa", "Alpha renamed", 10, 10));
        assert_eq!(layer.len(), 1);
        let node = layer.get(PageId::parse("aaaaaa").unwrap()).unwrap();
        assert_eq!(node.title, "Alpha renamed");
        assert_eq!(node.location, LogicalPoint::new(10, 10));
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut layer = NodeLayer::new();
        layer.insert(&page("aaaaaa", "A", 0, 0));
        layer.insert(&page("bbbbbb", "B", 0, 0));
        layer.insert(&page("cccccc", "C", 0, 0));
        layer.remove(PageId::parse("aaaaaa").unwrap());
        assert_eq!(layer.get(PageId::parse("cccccc").unwrap()).unwrap().title, "C");
        let order: Vec<&str> = layer.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(order, vec!["B", "C"]);
    }

    #[test]
    fn set_location_moves_node() {
        let mut layer = NodeLayer::new();
        layer.insert(&page("aaaaaa", "A", 0, 0));
        let id = PageId::parse("aaaaaa").unwrap();
        assert!(layer.set_location(id, LogicalPoint::new(-50, 100)));
        assert!(!layer.set_location(PageId::parse("zzzzzz").unwrap(), LogicalPoint::ORIGIN));
        assert_eq!(
            layer.bounds_of(id, &view()).unwrap().origin(),
            Point::new(350.0, 200.0)
        );
    }
}
