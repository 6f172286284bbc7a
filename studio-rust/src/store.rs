use crate::{Creation, StudioError, StudioResult};
use pixel_sprite_sdk::Credential;
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{debug, warn};

pub const CREDENTIAL_KEY: &str = "geminiApiKey";
pub const HISTORY_KEY: &str = "pixelSpriteHistory";

/// String key-value storage the wizard persists to.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> StudioResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StudioResult<()>;
    fn remove(&self, key: &str) -> StudioResult<()>;
}

/// In-memory storage with an optional size quota, like a browser's local
/// storage.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would grow the stored keys and values past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(bytes),
        }
    }

    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }

    fn lock(&self) -> StudioResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StudioError::Storage(std::io::Error::other("memory storage poisoned")))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StudioResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StudioResult<()> {
        let mut entries = self.lock()?;
        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = used + key.len() + value.len();
            if requested > quota {
                return Err(StudioError::QuotaExceeded(requested));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StudioResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One file per key inside a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> StudioResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StudioError::InvalidInput(format!(
                "Invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StudioResult<Option<String>> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StudioResult<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Readers never see a half-written value.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StudioResult<()> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// The API key and creation history, each under its own key.
///
/// A record that cannot be read back is discarded as a whole rather than
/// repaired.
#[derive(Clone)]
pub struct PersistedStore {
    storage: Arc<dyn Storage>,
}

impl PersistedStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn load_credential(&self) -> Option<Credential> {
        match self.storage.get(CREDENTIAL_KEY) {
            Ok(value) => value.and_then(|value| Credential::new(value).ok()),
            Err(error) => {
                warn!(%error, "failed to read stored API key");
                None
            }
        }
    }

    pub fn save_credential(&self, credential: &Credential) -> StudioResult<()> {
        self.storage.set(CREDENTIAL_KEY, credential.expose())
    }

    /// Most recent first. Empty when nothing is stored or the stored list is
    /// unreadable, in which case it is also removed.
    #[must_use]
    pub fn load_history(&self) -> Vec<Creation> {
        let stored = match self.storage.get(HISTORY_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(%error, "failed to read stored history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Creation>>(&stored) {
            Ok(history) => {
                debug!(creations = history.len(), "loaded history");
                history
            }
            Err(error) => {
                warn!(%error, "stored history is corrupt, clearing it");
                if let Err(error) = self.storage.remove(HISTORY_KEY) {
                    warn!(%error, "failed to clear corrupt history");
                }
                Vec::new()
            }
        }
    }

    /// Persist the whole history. When the write fails the stored record is
    /// removed so a stale list is never loaded later.
    pub fn save_history(&self, history: &[Creation]) -> StudioResult<()> {
        let result = serde_json::to_string(history)
            .map_err(StudioError::from)
            .and_then(|json| self.storage.set(HISTORY_KEY, &json));

        if let Err(error) = &result {
            warn!(%error, "failed to persist history, clearing stored history");
            if let Err(error) = self.storage.remove(HISTORY_KEY) {
                warn!(%error, "failed to clear stored history");
            }
        }
        result
    }
}
