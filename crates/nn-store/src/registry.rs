//! Global page id registry (`data/ids.csv`).
//!
//! Every id ever minted is recorded so that ids stay unique across books.

use crate::error::{LoadError, StoreError};
use nn_core::PageId;
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub struct IdRegistry {
    path: PathBuf,
    ids: HashSet<PageId>,
}

impl IdRegistry {
    /// Read the registry at `path`; a missing file is an empty registry.
    /// Unparseable lines are skipped.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(LoadError::io(&path, e)),
        };
        let ids = text
            .lines()
            .filter_map(|line| line.split(',').next())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .filter_map(|field| match PageId::parse(field) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::warn!("ignoring registry entry '{field}': {e}");
                    None
                }
            })
            .collect();
        Ok(Self { path, ids })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Draw random ids until an unused one comes up, then record it.
    pub async fn mint<R: Rng>(&mut self, rng: &mut R) -> Result<PageId, StoreError> {
        let id = loop {
            let candidate = PageId::generate(rng);
            if !self.ids.contains(&candidate) {
                break candidate;
            }
            log::debug!("id collision on {candidate}, redrawing");
        };
        self.record(id).await?;
        Ok(id)
    }

    /// Record an id minted elsewhere. Already-known ids are not rewritten.
    pub async fn record(&mut self, id: PageId) -> Result<(), StoreError> {
        if self.ids.contains(&id) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(format!("{id}\n").as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        self.ids.insert(id);
        Ok(())
    }
}
