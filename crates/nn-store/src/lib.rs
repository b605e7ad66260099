//! File-backed persistence for books, pages, links and page ids.
//!
//! Everything here is async (tokio fs) so a host can await a book load
//! without blocking its event loop.

pub mod error;
pub mod links;
pub mod page_file;
pub mod registry;
pub mod store;

pub use error::{LoadError, StoreError};
pub use links::{LinkFile, format_link, parse_link, read_links};
pub use page_file::{
    PageFile, PageRecord, decode_page, decode_page_file, encode_page, encode_page_with_links,
};
pub use registry::IdRegistry;
pub use store::{GraphStore, LoadedBook};
