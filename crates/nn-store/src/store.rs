//! Directory-per-book graph store.
//!
//! ```text
//! <root>/
//!   bag/<book>/<title>.json   one page per file
//!   bag/<book>/links.csv      links between pages of <book>
//!   links.csv                 global links, filtered per book on load
//!   data/ids.csv              every page id ever minted
//! ```

use crate::error::{LoadError, StoreError};
use crate::links::{append_link, read_links};
use crate::page_file::{decode_page_file, encode_page_with_links};
use crate::registry::IdRegistry;
use nn_core::{
    Book, Link, LinkOutcome, LogicalPoint, Page, PageId, is_valid_book_name, sanitize_title,
};
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const BOOKS_DIR: &str = "bag";
const DATA_DIR: &str = "data";
const IDS_FILE: &str = "ids.csv";
const LINKS_FILE: &str = "links.csv";

/// A loaded book plus every file or record that had to be skipped.
#[derive(Debug)]
pub struct LoadedBook {
    pub book: Book,
    pub skipped: Vec<LoadError>,
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    root: PathBuf,
}

impl GraphStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn book_dir(&self, book: &str) -> PathBuf {
        self.root.join(BOOKS_DIR).join(book)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(IDS_FILE)
    }

    pub fn global_links_path(&self) -> PathBuf {
        self.root.join(LINKS_FILE)
    }

    /// Names of every book directory, sorted.
    pub async fn list_books(&self) -> Result<Vec<String>, LoadError> {
        let dir = self.root.join(BOOKS_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LoadError::io(&dir, e)),
        };
        let mut books = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LoadError::io(&dir, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| LoadError::io(entry.path(), e))?
                .is_dir();
            if is_dir && let Some(name) = entry.file_name().to_str() {
                books.push(name.to_string());
            }
        }
        books.sort();
        Ok(books)
    }

    /// Ensure the book directory exists. Existing books are left untouched.
    pub async fn create_book(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_book_name(name) {
            return Err(StoreError::InvalidBookName(name.to_string()));
        }
        let dir = self.book_dir(name);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;
        log::info!("book '{name}' ready at {}", dir.display());
        Ok(dir)
    }

    /// Read every page and link of `name`.
    ///
    /// Fails only when the book directory is missing or unreadable. Pages
    /// that fail to parse, duplicate ids, malformed link records and links
    /// to pages outside the book are skipped with a warning.
    pub async fn load_book(&self, name: &str) -> Result<LoadedBook, LoadError> {
        if !is_valid_book_name(name) {
            return Err(LoadError::BookNotFound(name.to_string()));
        }
        let dir = self.book_dir(name);
        let exists = tokio::fs::try_exists(&dir)
            .await
            .map_err(|e| LoadError::io(&dir, e))?;
        if !exists {
            return Err(LoadError::BookNotFound(name.to_string()));
        }

        let mut book = Book::new(name);
        let mut skipped = Vec::new();
        // Links stored inside legacy page files, by target page name.
        let mut embedded: Vec<(PageId, Vec<String>)> = Vec::new();
        let mut by_stem: HashMap<String, PageId> = HashMap::new();

        for path in self.page_files(&dir).await? {
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    skipped.push(LoadError::io(&path, e));
                    continue;
                }
            };
            match decode_page_file(&path, &text) {
                Ok(file) if book.contains(file.page.id()) => {
                    let e = LoadError::DuplicateId {
                        path: path.clone(),
                        id: file.page.id(),
                    };
                    log::warn!("skipping page: {e}");
                    skipped.push(e);
                }
                Ok(file) => {
                    let id = file.page.id();
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        by_stem.insert(stem.to_string(), id);
                    }
                    if !file.linked_names.is_empty() {
                        embedded.push((id, file.linked_names));
                    }
                    book.add_page(file.page);
                }
                Err(e) => {
                    log::warn!("skipping page: {e}");
                    skipped.push(e);
                }
            }
        }

        for (from, names) in embedded {
            for target in names {
                let key = target.trim();
                let key = key.strip_suffix(".json").unwrap_or(key);
                let to = by_stem
                    .get(key)
                    .copied()
                    .or_else(|| book.page_by_title(key).map(Page::id));
                let Some(to) = to else {
                    log::warn!("page {from} links to unknown page '{target}'");
                    continue;
                };
                if let Err(e) = book.add_link(Link::new(from, to)) {
                    log::warn!("skipping embedded link: {e}");
                }
            }
        }

        let book_links = read_links(&dir.join(LINKS_FILE)).await?;
        let global_links = read_links(&self.global_links_path()).await?;
        for file in [book_links, global_links] {
            for link in file.links {
                if !(book.contains(link.from) && book.contains(link.to)) {
                    log::debug!("link {} -> {} not in book '{name}'", link.from, link.to);
                    continue;
                }
                if let Err(e) = book.add_link(link) {
                    log::warn!("skipping link: {e}");
                }
            }
            for e in file.malformed {
                log::warn!("{e}");
                skipped.push(e);
            }
        }

        log::info!(
            "loaded book '{name}': {} pages, {} links, {} skipped",
            book.page_count(),
            book.link_count(),
            skipped.len()
        );
        Ok(LoadedBook { book, skipped })
    }

    /// Write `page` to `<book>/<sanitized title>.json`.
    ///
    /// A file there that holds a different page is never overwritten: the
    /// page goes to `<sanitized title>_<id>.json` instead. Links embedded in
    /// the page's previous file are carried over.
    pub async fn save_page(&self, book: &str, page: &Page) -> Result<PathBuf, StoreError> {
        let dir = self.existing_book_dir(book).await?;
        let (path, linked_names) = page_slot(&dir, page).await?;
        let json = encode_page_with_links(page, linked_names)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        log::debug!("saved page {} to {}", page.id(), path.display());
        Ok(path)
    }

    /// Mint a fresh id, then create and save a page with it.
    pub async fn create_page<R: Rng>(
        &self,
        book: &str,
        title: &str,
        content: &str,
        location: LogicalPoint,
        rng: &mut R,
    ) -> Result<Page, StoreError> {
        self.existing_book_dir(book).await?;
        let mut registry = IdRegistry::open(self.registry_path()).await?;
        let id = registry.mint(rng).await?;
        let page = Page::new(id, title)
            .with_content(content)
            .at(location);
        self.save_page(book, &page).await?;
        log::info!("created page {id} '{title}' in book '{book}'");
        Ok(page)
    }

    /// Link two pages of `book`. An identical link (same endpoints and
    /// style) is not written twice.
    pub async fn create_link(&self, book: &str, link: Link) -> Result<LinkOutcome, StoreError> {
        let mut loaded = self.load_book(book).await?.book;
        let outcome = loaded
            .add_link(link.clone())
            .map_err(|e| StoreError::from_link(e, book))?;
        if outcome == LinkOutcome::AlreadyExists {
            log::debug!("link {} -> {} already exists", link.from, link.to);
            return Ok(outcome);
        }
        let path = self.book_dir(book).join(LINKS_FILE);
        append_link(&path, &link)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        log::info!(
            "linked {} -> {} ({}) in book '{book}'",
            link.from,
            link.to,
            link.style
        );
        Ok(outcome)
    }

    async fn existing_book_dir(&self, book: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_book_name(book) {
            return Err(StoreError::InvalidBookName(book.to_string()));
        }
        let dir = self.book_dir(book);
        let exists = tokio::fs::try_exists(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;
        if !exists {
            return Err(LoadError::BookNotFound(book.to_string()).into());
        }
        Ok(dir)
    }

    /// `*.json` files directly inside `dir`, sorted by name.
    async fn page_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| LoadError::io(dir, e))?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LoadError::io(dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Who holds a page file path.
enum Slot {
    Vacant,
    /// The page itself, with the links embedded in its file.
    Own(Vec<String>),
    /// Another page, or a file that cannot be read as a page.
    Taken,
}

async fn slot_of(path: &Path, id: PageId) -> Result<Slot, StoreError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Slot::Vacant),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    Ok(match decode_page_file(path, &text) {
        Ok(file) if file.page.id() == id => Slot::Own(file.linked_names),
        _ => Slot::Taken,
    })
}

/// Pick the file for `page`: its existing file if it has one, else the
/// title-derived name, else the title plus id.
async fn page_slot(dir: &Path, page: &Page) -> Result<(PathBuf, Vec<String>), StoreError> {
    let stem = sanitize_title(&page.title);
    let primary = dir.join(format!("{stem}.json"));
    let fallback = dir.join(format!("{stem}_{}.json", page.id()));

    let first = match slot_of(&primary, page.id()).await? {
        Slot::Own(links) => return Ok((primary, links)),
        other => other,
    };
    match (first, slot_of(&fallback, page.id()).await?) {
        (_, Slot::Own(links)) => Ok((fallback, links)),
        (Slot::Vacant, _) => Ok((primary, Vec::new())),
        (_, Slot::Vacant) => {
            log::warn!(
                "{} holds another page; storing {} as {}",
                primary.display(),
                page.id(),
                fallback.display()
            );
            Ok((fallback, Vec::new()))
        }
        _ => Err(StoreError::TitleCollision {
            path: fallback,
            id: page.id(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_core::PageId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn list_books_sorted_dirs_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        assert!(store.list_books().await.unwrap().is_empty());
        store.create_book("zeta").await.unwrap();
        store.create_book("alpha").await.unwrap();
        tokio::fs::write(dir.path().join("bag").join("stray.txt"), "x")
            .await
            .unwrap();
        assert_eq!(store.list_books().await.unwrap(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn create_book_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        for bad in ["", "..", "a/b", "what?"] {
            assert!(matches!(
                store.create_book(bad).await,
                Err(StoreError::InvalidBookName(_))
            ));
        }
    }

    #[tokio::test]
    async fn missing_book_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        assert!(matches!(
            store.load_book("nope").await,
            Err(LoadError::BookNotFound(_))
        ));
        let page = Page::new(PageId::parse("abc123").unwrap(), "T");
        assert!(matches!(
            store.save_page("nope", &page).await,
            Err(StoreError::Load(LoadError::BookNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn create_page_sanitizes_filename_and_registers_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = GraphStore::new(dir.path());
        store.create_book("notes").await.unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let page = store
            .create_page("notes", "what? a/b", "", LogicalPoint::new(50, -50), &mut rng)
            .await
            .unwrap();
        assert!(store.book_dir("notes").join("what_ a_b.json").exists());
        let registry = IdRegistry::open(store.registry_path()).await.unwrap();
        assert!(registry.contains(page.id()));
    }
}
