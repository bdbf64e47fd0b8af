//! JSON-file backed credential store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use fs2::FileExt;
use tracing::{debug, instrument, warn};

use todolink_core::Result;
use todolink_core::error::StorageError;
use todolink_core::{CredentialStore, StorageKey};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

type Values = BTreeMap<StorageKey, String>;

fn map_io(path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// A [`CredentialStore`] persisted as a flat JSON object.
///
/// Reads are served from memory. Every write reloads the file under an
/// exclusive lock on a sibling `.lock` file, applies the batch, and replaces
/// the file through a temporary file and rename, so other processes sharing
/// the path never see a torn document. The in-memory copy is swapped only
/// after the file was written.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<Values>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = Self::load(&path)?;
        debug!(path = %path.display(), keys = values.len(), "Opened credential store");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn load(path: &Path) -> Result<Values> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Values::new()),
            Err(e) => return Err(map_io(path, e).into()),
        };

        if content.trim().is_empty() {
            return Ok(Values::new());
        }

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut values = Values::new();
        for (name, value) in raw {
            match name.parse::<StorageKey>() {
                Ok(key) => {
                    values.insert(key, value);
                }
                Err(_) => warn!(key = %name, "Ignoring unknown key in credential store"),
            }
        }
        Ok(values)
    }

    fn persist(&self, values: &Values) -> Result<()> {
        let raw: BTreeMap<&str, &str> = values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let json = serde_json::to_string_pretty(&raw).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let tmp = self.tmp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| map_io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| map_io(&tmp, e))?;
        file.sync_data().map_err(|e| map_io(&tmp, e))?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
            .map_err(|e| map_io(&tmp, e))?;

        fs::rename(&tmp, &self.path).map_err(|e| map_io(&self.path, e))?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(&key).cloned()
    }

    fn get_many(&self, keys: &[StorageKey]) -> Vec<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        keys.iter().map(|key| values.get(key).cloned()).collect()
    }

    #[instrument(skip_all, fields(path = %self.path.display(), writes = writes.len()))]
    fn write_batch(&self, writes: &[(StorageKey, Option<&str>)]) -> Result<()> {
        // Held across the file write so local readers see old or new, never both.
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| map_io(&lock_path, e))?;

        let result = Self::load(&self.path).and_then(|mut next| {
            for (key, value) in writes {
                match value {
                    Some(value) => {
                        next.insert(*key, (*value).to_string());
                    }
                    None => {
                        next.remove(key);
                    }
                }
            }
            self.persist(&next)?;
            Ok(next)
        });

        if let Err(e) = lock_file.unlock() {
            warn!(error = %e, "Failed to release store lock");
        }

        *values = result?;
        debug!("Credential store updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;
    use todolink_core::TokenPair;

    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("credentials.json")).unwrap();
        assert!(store.access_token().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = FileStore::open(&path).unwrap();
        store.save_tokens(&TokenPair::new("A1", "R1")).unwrap();
        store.set(StorageKey::SelectedLanguage, "it").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.access_token().unwrap().as_str(), "A1");
        assert_eq!(reopened.refresh_token().unwrap().as_str(), "R1");
        let pair = reopened.token_pair().unwrap();
        assert_eq!((pair.access.as_str(), pair.refresh.as_str()), ("A1", "R1"));
        assert_eq!(
            reopened.get(StorageKey::SelectedLanguage).as_deref(),
            Some("it")
        );
    }

    #[test]
    fn file_uses_flat_key_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileStore::open(&path).unwrap();
        store.set(StorageKey::AppTheme, "1").unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"settings.apptheme": "1"}));
    }

    #[test]
    fn clear_tokens_keeps_preferences() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("credentials.json")).unwrap();
        store.save_tokens(&TokenPair::new("A1", "R1")).unwrap();
        store.set(StorageKey::AppTheme, "2").unwrap();

        store.clear_tokens().unwrap();

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert_eq!(store.get(StorageKey::AppTheme).as_deref(), Some("2"));
    }

    #[test]
    fn writes_from_another_handle_are_merged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        let first = FileStore::open(&path).unwrap();
        let second = FileStore::open(&path).unwrap();
        first.set(StorageKey::AppTheme, "2").unwrap();
        second.set(StorageKey::SelectedLanguage, "it").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(StorageKey::AppTheme).as_deref(), Some("2"));
        assert_eq!(
            reopened.get(StorageKey::SelectedLanguage).as_deref(),
            Some("it")
        );
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("corrupt store"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"auth.token.access": "A1", "legacy.key": "x"}"#).unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.access_token().unwrap().as_str(), "A1");
    }

    #[test]
    fn concurrent_writers_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::open(dir.path().join("credentials.json")).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .save_tokens(&TokenPair::new(format!("A{i}"), format!("R{i}")))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let access = store.access_token().unwrap();
        let refresh = store.refresh_token().unwrap();
        assert_eq!(access.as_str()[1..], refresh.as_str()[1..]);
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileStore::open(&path).unwrap();
        store.set(StorageKey::AccessToken, "A1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
