//! Storage backends for preference values
//!
//! A backend is a flat string-to-string table with explicit presence:
//! [`SettingsBackend::load`] returns `None` for a missing key rather than a
//! reserved sentinel value, so every string (including the empty string) is
//! storable. The store layers defaults and fallback on top of this trait;
//! backends only persist what was explicitly written.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Storage interface for explicitly written preference values
///
/// Implementations persist key/value pairs for a preference store. Only
/// values written through [`store`](Self::store) exist in a backend;
/// defaults live in the store layer and are never written down here.
pub trait SettingsBackend {
    /// Look up the stored value for a key
    ///
    /// Returns `None` when the key has never been stored (or has been
    /// removed). An empty string is a stored value, not an absence.
    fn load(&self, key: &str) -> Option<String>;

    /// Store a value for a key, replacing any previous value
    fn store(&mut self, key: &str, value: &str);

    /// Remove the stored value for a key
    ///
    /// Removing a key that was never stored is a no-op.
    fn remove(&mut self, key: &str);
}

/// In-memory backend with no persistence
///
/// Values live for the lifetime of the backend and are lost on drop.
/// Useful for tests and for preferences that should not outlive the
/// process.
///
/// # Example
///
/// ```rust
/// use prefstore::{MemoryBackend, SettingsBackend};
///
/// let mut backend = MemoryBackend::new();
/// backend.store("volume", "80");
/// assert_eq!(backend.load("volume").as_deref(), Some("80"));
///
/// backend.remove("volume");
/// assert_eq!(backend.load("volume"), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    /// Stored key/value pairs
    values: HashMap<String, String>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// On-disk document format for [`JsonFileBackend`]
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    /// Stored key/value pairs
    settings: HashMap<String, String>,
}

/// File-backed backend storing values as a JSON document
///
/// All values are kept in memory and written through to the file on every
/// mutation, so reads never touch the disk after [`open`](Self::open). A
/// failed write is logged and the in-memory state keeps the new value; the
/// next successful write persists it.
///
/// # Example
///
/// ```rust,no_run
/// use prefstore::{JsonFileBackend, SettingsBackend};
///
/// let mut backend = JsonFileBackend::open("/var/lib/myapp/settings.json")?;
/// backend.store("volume", "80");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonFileBackend {
    /// Path of the JSON document
    path: PathBuf,
    /// Stored key/value pairs, mirrored to the file on every mutation
    values: HashMap<String, String>,
}

impl JsonFileBackend {
    /// Open a file-backed settings store, creating an empty one if the
    /// file does not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if its
    /// contents are not a valid settings document.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match fs::read_to_string(&path) {
            Ok(contents) => {
                let file: SettingsFile = serde_json::from_str(&contents)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                file.settings
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };

        debug!(
            "opened settings file {} with {} entries",
            path.display(),
            values.len()
        );

        Ok(Self { path, values })
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current values out to the backing file
    fn persist(&self) {
        let file = SettingsFile {
            settings: self.values.clone(),
        };
        let rendered = match serde_json::to_string_pretty(&file) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!("failed to encode settings for {}: {}", self.path.display(), e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, rendered) {
            warn!("failed to persist settings to {}: {}", self.path.display(), e);
        }
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist();
        }
    }
}
