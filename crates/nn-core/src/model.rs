//! Page/link graph data model.
//!
//! A `Book` is a directed graph where nodes are `Page`s and edges are
//! `Link`s. Pages carry a persisted logical location and a style; links are
//! identified by the ordered tuple `(from, to, style)`.

use crate::id::PageId;
use crate::style::PageStyle;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Style tag used when a link does not name one.
pub const DEFAULT_LINK_STYLE: &str = "default";

/// Characters replaced by `_` when deriving a page filename from its title.
const UNSAFE_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

// ─── Logical coordinates ─────────────────────────────────────────────────

/// Persisted, pan/zoom-independent position of a page. Positive `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl LogicalPoint {
    pub const ORIGIN: LogicalPoint = LogicalPoint { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ─── Page ────────────────────────────────────────────────────────────────

/// A graph node: a titled, positioned, styled content unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Immutable once assigned.
    id: PageId,
    pub title: String,
    pub content: String,
    pub location: LogicalPoint,
    pub style: PageStyle,
}

impl Page {
    pub fn new(id: PageId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: String::new(),
            location: LogicalPoint::ORIGIN,
            style: PageStyle::default(),
        }
    }

    pub fn at(mut self, location: LogicalPoint) -> Self {
        self.location = location;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_style(mut self, style: PageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Filename this page is stored under: sanitized title plus `.json`.
    pub fn file_name(&self) -> String {
        format!("{}.json", sanitize_title(&self.title))
    }
}

/// Replace characters that are unsafe in filenames with `_`.
/// An empty (or whitespace-only) title becomes `Untitled`.
pub fn sanitize_title(title: &str) -> String {
    if title.trim().is_empty() {
        return "Untitled".to_string();
    }
    title
        .chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Whether `name` can be used verbatim as a book directory.
pub fn is_valid_book_name(name: &str) -> bool {
    !name.trim().is_empty() && name != "." && name != ".." && sanitize_title(name) == name
}

// ─── Link ────────────────────────────────────────────────────────────────

/// A graph edge between two pages, tagged with a style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub from: PageId,
    pub to: PageId,
    pub style: String,
}

impl Link {
    pub fn new(from: PageId, to: PageId) -> Self {
        Self::styled(from, to, DEFAULT_LINK_STYLE)
    }

    pub fn styled(from: PageId, to: PageId, style: impl Into<String>) -> Self {
        Self {
            from,
            to,
            style: style.into(),
        }
    }
}

/// Result of adding a link. Duplicates are benign, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    AlreadyExists,
}

/// Why a link could not be added to a book.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("page {0} is not in this book")]
    UnknownPage(PageId),
    #[error("page {0} cannot link to itself")]
    SelfLink(PageId),
}

// ─── Book ────────────────────────────────────────────────────────────────

/// A named collection of pages and the links between them.
#[derive(Debug, Clone)]
pub struct Book {
    pub name: String,

    /// Pages are nodes; edge weights are link style tags.
    graph: StableDiGraph<Page, String>,

    /// Index from PageId → NodeIndex for fast lookup.
    id_index: HashMap<PageId, NodeIndex>,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
        }
    }

    /// Insert a page, replacing any page with the same id (its links stay).
    pub fn add_page(&mut self, page: Page) -> NodeIndex {
        if let Some(&idx) = self.id_index.get(&page.id) {
            self.graph[idx] = page;
            return idx;
        }
        let id = page.id;
        let idx = self.graph.add_node(page);
        self.id_index.insert(id, idx);
        idx
    }

    /// Remove a page and every link touching it.
    pub fn remove_page(&mut self, id: PageId) -> Option<Page> {
        let idx = self.id_index.remove(&id)?;
        self.graph.remove_node(idx)
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Find a page by exact title.
    pub fn page_by_title(&self, title: &str) -> Option<&Page> {
        self.pages().find(|p| p.title == title)
    }

    /// Pages in `NodeIndex` order (insertion order until a page is removed
    /// and its slot reused).
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort();
        indices.into_iter().map(move |idx| &self.graph[idx])
    }

    pub fn page_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_link(&self, link: &Link) -> bool {
        let (Some(&a), Some(&b)) = (self.id_index.get(&link.from), self.id_index.get(&link.to))
        else {
            return false;
        };
        self.graph
            .edges_connecting(a, b)
            .any(|e| *e.weight() == link.style)
    }

    /// Add a link between two pages of this book. Idempotent per `(from, to, style)`.
    pub fn add_link(&mut self, link: Link) -> Result<LinkOutcome, LinkError> {
        if link.from == link.to {
            return Err(LinkError::SelfLink(link.from));
        }
        let a = *self
            .id_index
            .get(&link.from)
            .ok_or(LinkError::UnknownPage(link.from))?;
        let b = *self
            .id_index
            .get(&link.to)
            .ok_or(LinkError::UnknownPage(link.to))?;
        if self.has_link(&link) {
            return Ok(LinkOutcome::AlreadyExists);
        }
        self.graph.add_edge(a, b, link.style);
        Ok(LinkOutcome::Created)
    }

    /// All links in insertion order.
    pub fn links(&self) -> Vec<Link> {
        let mut edges: Vec<_> = (&self.graph).edge_references().collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| Link {
                from: self.graph[e.source()].id,
                to: self.graph[e.target()].id,
                style: e.weight().clone(),
            })
            .collect()
    }

    /// Links with `id` at either end.
    pub fn links_of(&self, id: PageId) -> Vec<Link> {
        self.links()
            .into_iter()
            .filter(|l| l.from == id || l.to == id)
            .collect()
    }
}
