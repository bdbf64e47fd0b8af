//! Location and opening of the credential file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use todolink_file::FileStore;

/// Get the default credential file path.
fn default_store_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "todolink").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}

/// Resolve the credential file, preferring an explicit path.
pub fn store_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_store_path(),
    }
}

/// Open the credential store. The file is created on first write.
pub fn open_store(explicit: Option<&Path>) -> Result<Arc<FileStore>> {
    let path = store_path(explicit)?;
    debug!(path = %path.display(), "Opening credential store");

    let store = FileStore::open(&path)
        .with_context(|| format!("Failed to open credential store {}", path.display()))?;
    Ok(Arc::new(store))
}
