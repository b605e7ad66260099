//! On-disk page JSON.
//!
//! Written as `page_title, page_id, page_content, page_location, page_style`.
//! Older files are read as well:
//! - `node_title`/`node_id`/`node_content`, optionally with `node_links`
//!   (names of linked pages in the same book)
//! - `neu_title`/`neu_id`/`neu_content`
//!
//! A missing content, location or style falls back to its default.

use crate::error::LoadError;
use nn_core::{LogicalPoint, Page, PageId, PageStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(alias = "node_title", alias = "neu_title")]
    pub page_title: String,
    /// Kept as text so a bad id is reported as such, not as a JSON error.
    #[serde(alias = "node_id", alias = "neu_id")]
    pub page_id: String,
    #[serde(alias = "node_content", alias = "neu_content", default)]
    pub page_content: String,
    #[serde(default)]
    pub page_location: LogicalPoint,
    #[serde(default)]
    pub page_style: PageStyle,
    /// Outgoing links stored inside the page, by target page name.
    /// Preserved on rewrite; new links go to `links.csv`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_links: Vec<String>,
}

impl From<&Page> for PageRecord {
    fn from(page: &Page) -> Self {
        Self {
            page_title: page.title.clone(),
            page_id: page.id().to_string(),
            page_content: page.content.clone(),
            page_location: page.location,
            page_style: page.style.clone(),
            node_links: Vec::new(),
        }
    }
}

impl PageRecord {
    pub fn into_page(self) -> Result<Page, nn_core::IdError> {
        self.into_page_file().map(|file| file.page)
    }

    pub fn into_page_file(self) -> Result<PageFile, nn_core::IdError> {
        let id = PageId::parse(&self.page_id)?;
        let page = Page::new(id, self.page_title)
            .with_content(self.page_content)
            .at(self.page_location)
            .with_style(self.page_style);
        Ok(PageFile {
            page,
            linked_names: self.node_links,
        })
    }
}

/// A decoded page file: the page plus any links embedded in it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFile {
    pub page: Page,
    pub linked_names: Vec<String>,
}

/// Decode a page file's contents. `path` is only used for error reporting.
pub fn decode_page_file(path: &Path, text: &str) -> Result<PageFile, LoadError> {
    let record: PageRecord =
        serde_json::from_str(text).map_err(|source| LoadError::InvalidPage {
            path: path.to_path_buf(),
            source,
        })?;
    record.into_page_file().map_err(|source| LoadError::InvalidId {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a page file, discarding embedded links.
pub fn decode_page(path: &Path, text: &str) -> Result<Page, LoadError> {
    decode_page_file(path, text).map(|file| file.page)
}

/// Pretty-printed JSON for `page`.
pub fn encode_page(page: &Page) -> Result<String, serde_json::Error> {
    encode_page_with_links(page, Vec::new())
}

/// Pretty-printed JSON for `page`, keeping embedded link names.
pub fn encode_page_with_links(
    page: &Page,
    linked_names: Vec<String>,
) -> Result<String, serde_json::Error> {
    let record = PageRecord {
        node_links: linked_names,
        ..PageRecord::from(page)
    };
    serde_json::to_string_pretty(&record)
}
