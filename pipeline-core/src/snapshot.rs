//! YAML snapshot of a [`PipelineStore`].
//!
//! # Storage layout
//!
//! ```text
//! ~/.pipeline/
//!   store.yaml   (mode 0600; directory mode 0700)
//! ```
//!
//! # API pattern
//!
//! Functions take an explicit path (`_at`); the default location is resolved
//! separately by [`default_path`] so tests never touch the real home.

use std::path::{Path, PathBuf};

use crate::error::SnapshotError;
use crate::store::PipelineStore;

/// `<home>/.pipeline/store.yaml`. Pure, no I/O.
pub fn store_path_at(home: &Path) -> PathBuf {
    home.join(".pipeline").join("store.yaml")
}

/// `store_path_at` for the current user's home directory.
pub fn default_path() -> Result<PathBuf, SnapshotError> {
    let home = dirs::home_dir().ok_or(SnapshotError::HomeNotFound)?;
    Ok(store_path_at(&home))
}

/// Load a store snapshot.
///
/// Returns `SnapshotError::Io` if the file cannot be read and
/// `SnapshotError::Parse` (with the path) if the YAML is malformed.
pub fn load_at(path: &Path) -> Result<PipelineStore, SnapshotError> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| SnapshotError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Like [`load_at`], but a missing file yields an empty store.
pub fn load_or_default_at(path: &Path) -> Result<PipelineStore, SnapshotError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no snapshot yet, starting empty");
        return Ok(PipelineStore::new());
    }
    load_at(path)
}

/// Atomically write the snapshot.
///
/// Write flow: serialize → `.tmp` sibling → `chmod 0600` → `rename`. The
/// `.tmp` file lives next to the target so the rename never crosses filesystems.
pub fn save_at(path: &Path, store: &PipelineStore) -> Result<(), SnapshotError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            set_dir_permissions(dir)?;
        }
    }
    let tmp_path = tmp_path_for(path);

    let yaml = serde_yaml::to_string(store)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, path)?;
    tracing::debug!(
        path = %path.display(),
        leads = store.leads().len(),
        orders = store.orders().len(),
        "snapshot saved"
    );
    Ok(())
}

/// `<file>.tmp` next to `path`.
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store.yaml".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), SnapshotError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), SnapshotError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), SnapshotError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), SnapshotError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
