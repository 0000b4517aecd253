//! Persisted key-value slot for the session token and the cached user record. Only the
//! session store writes here; the gateway reaches it through the store when a `401`
//! clears the session. Writes are last-write-wins.

use super::errors::AppError;
use std::{
    collections::{BTreeMap, HashMap},
    fs::{self, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tracing::debug;

/// Storage for small string values that must survive restarts.
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    /// Returns `AppError::Storage` if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removing a missing key succeeds.
    /// # Errors
    /// Returns `AppError::Storage` if the backing medium cannot be updated.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.values
            .lock()
            .map_err(|_| AppError::Storage("Session storage lock poisoned.".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON object file holding every key. A missing file reads as empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Storage(format!(
                    "Failed to decode {}: {err}",
                    self.path.display()
                ))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Storage(format!("Failed to create {}: {err}", parent.display()))
            })?;
        }

        let payload = serde_json::to_string_pretty(values)
            .map_err(|err| AppError::Storage(format!("Failed to encode session state: {err}")))?;

        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, payload.as_bytes())
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|err| {
                AppError::Storage(format!("Failed to write {}: {err}", self.path.display()))
            })?;

        debug!("session state written to {}", self.path.display());

        Ok(())
    }

    fn update(
        &self,
        mutate: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), AppError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| AppError::Storage("Session storage lock poisoned.".to_string()))?;
        let mut values = self.read_all()?;
        if mutate(&mut values) {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// Writes `contents` to a file only the current user can read (mode `0600` on Unix).
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        // the mode above only applies when the file is created
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(contents)?;
        file.sync_all()
    }
    #[cfg(not(unix))]
    {
        let mut file = options.open(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.update(|values| values.remove(key).is_some())
    }
}
