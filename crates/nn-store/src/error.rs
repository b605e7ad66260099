use nn_core::{IdError, LinkError, PageId};
use std::path::PathBuf;

/// Failure to read a book back from disk.
///
/// Only `BookNotFound` and `Io` on the book directory itself abort a load;
/// per-file problems are collected as skipped entries instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("book '{0}' does not exist")]
    BookNotFound(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page file {}: {source}", path.display())]
    InvalidPage {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid page id in {}: {source}", path.display())]
    InvalidId {
        path: PathBuf,
        #[source]
        source: IdError,
    },

    #[error("page id {id} in {} is already used by another file", path.display())]
    DuplicateId { path: PathBuf, id: PageId },

    #[error("malformed link record at {}:{line}: '{record}'", path.display())]
    MalformedLink {
        path: PathBuf,
        line: usize,
        record: String,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a store write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize page: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("'{0}' is not a valid book name")]
    InvalidBookName(String),

    #[error("page {0} is not in book '{1}'")]
    UnknownPage(PageId, String),

    #[error("page {0} cannot link to itself")]
    SelfLink(PageId),

    #[error("cannot store page {id}: {} holds a different page", path.display())]
    TitleCollision { path: PathBuf, id: PageId },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn from_link(err: LinkError, book: &str) -> Self {
        match err {
            LinkError::UnknownPage(id) => Self::UnknownPage(id, book.to_string()),
            LinkError::SelfLink(id) => Self::SelfLink(id),
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
