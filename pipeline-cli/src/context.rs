//! The store a command operates on, loaded once and saved after mutations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pipeline_core::{snapshot, PipelineStore};

pub struct StoreContext {
    path: PathBuf,
    pub store: PipelineStore,
}

impl StoreContext {
    /// Open the snapshot at `path`, or the default location when `None`.
    /// A missing snapshot starts an empty store.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => snapshot::default_path().context("cannot locate default store")?,
        };
        let store = snapshot::load_or_default_at(&path)
            .with_context(|| format!("failed to load store '{}'", path.display()))?;
        Ok(Self { path, store })
    }

    /// Persist the store after a successful mutation.
    pub fn commit(&self) -> Result<()> {
        snapshot::save_at(&self.path, &self.store)
            .with_context(|| format!("failed to save store '{}'", self.path.display()))
    }
}
