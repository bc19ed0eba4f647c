//! Preference store with runtime defaults and reset support

use std::collections::HashMap;
use std::sync::MutexGuard;

use tracing::debug;

use crate::backend::SettingsBackend;
use crate::error::{PrefsError, Result};
use crate::registry::{DefaultsRegistry, SharedDefaults};

/// Key/value preference store layered over a storage backend
///
/// A store reads and writes string values through its backend and overlays
/// a table of runtime defaults on top: [`get`](Self::get) returns the
/// stored value when one exists, the registered default otherwise. Because
/// defaults are never written into the backend, resetting a key is simply
/// removing its stored value.
///
/// Stores with the same identifier opened against the same
/// [`DefaultsRegistry`] share one defaults table, so an application can
/// register its defaults once and open stores wherever convenient. The
/// backends themselves are per-instance and may differ.
///
/// # Example
///
/// ```rust
/// use prefstore::{DefaultsRegistry, MemoryBackend, Prefs};
///
/// let registry = DefaultsRegistry::new();
/// let mut prefs = Prefs::open("player", MemoryBackend::new(), &registry);
///
/// prefs.set_default("volume", "50");
/// assert_eq!(prefs.get("volume").unwrap(), "50");
///
/// prefs.set("volume", "80");
/// assert_eq!(prefs.get("volume").unwrap(), "80");
///
/// prefs.reset_to_default("volume").unwrap();
/// assert_eq!(prefs.get("volume").unwrap(), "50");
/// ```
#[derive(Debug)]
pub struct Prefs<B> {
    /// Identifier naming this store in the defaults registry
    id: String,
    /// Storage for explicitly written values
    backend: B,
    /// Defaults table shared with every store of the same id
    defaults: SharedDefaults,
}

impl<B: SettingsBackend> Prefs<B> {
    /// Open a preference store with the given identifier and backend
    ///
    /// The identifier selects the defaults table in `registry`; the first
    /// open of an identifier creates an empty table, later opens attach to
    /// the existing one. The backend holds this instance's stored values
    /// and is consumed by the store.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prefstore::{DefaultsRegistry, MemoryBackend, Prefs};
    ///
    /// let registry = DefaultsRegistry::new();
    /// let prefs = Prefs::open("player", MemoryBackend::new(), &registry);
    /// assert_eq!(prefs.id(), "player");
    /// ```
    pub fn open(id: impl Into<String>, backend: B, registry: &DefaultsRegistry) -> Self {
        let id = id.into();
        let defaults = registry.defaults_for(&id);
        debug!("opened preference store '{}'", id);
        Self {
            id,
            backend,
            defaults,
        }
    }

    /// Identifier this store was opened with
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the value for a key
    ///
    /// The stored value wins; if the key was never stored (or has been
    /// reset), the registered default is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::NoValue`] if the key has neither a stored
    /// value nor a default.
    pub fn get(&self, key: &str) -> Result<String> {
        if let Some(value) = self.backend.load(key) {
            return Ok(value);
        }
        match self.lock_defaults().get(key) {
            Some(default) => Ok(default.clone()),
            None => Err(PrefsError::NoValue {
                key: key.to_string(),
            }),
        }
    }

    /// Store a value for a key, replacing any previous value
    ///
    /// The default for the key, if any, is untouched and becomes visible
    /// again after [`reset_to_default`](Self::reset_to_default).
    pub fn set(&mut self, key: &str, value: &str) {
        self.backend.store(key, value);
    }

    /// Register the default value for a key
    ///
    /// The default is shared with every store of the same identifier on
    /// the same registry and lives only as long as the registry; it is
    /// never written to a backend. Takes `&self` because only the shared
    /// defaults table changes, not this instance's stored values.
    pub fn set_default(&self, key: &str, value: &str) {
        self.lock_defaults()
            .insert(key.to_string(), value.to_string());
    }

    /// Reset a key to its default by removing the stored value
    ///
    /// After this call [`get`](Self::get) returns the registered default
    /// until the key is stored again.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::NoDefault`] if no default is registered for
    /// the key; the stored value is left in place in that case.
    pub fn reset_to_default(&mut self, key: &str) -> Result<()> {
        let has_default = self.lock_defaults().contains_key(key);
        if !has_default {
            return Err(PrefsError::NoDefault {
                key: key.to_string(),
            });
        }
        self.backend.remove(key);
        Ok(())
    }

    /// Reset every key that has a registered default
    ///
    /// Stored values for keys without a default are left alone, so this
    /// restores the configured baseline without wiping unrelated entries.
    pub fn reset_all_to_defaults(&mut self) {
        let keys: Vec<String> = self.lock_defaults().keys().cloned().collect();
        for key in &keys {
            self.backend.remove(key);
        }
    }

    fn lock_defaults(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.defaults.lock().expect("defaults table lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn store(registry: &DefaultsRegistry) -> Prefs<MemoryBackend> {
        Prefs::open("player", MemoryBackend::new(), registry)
    }

    #[test]
    fn test_stored_value_wins_over_default() {
        let registry = DefaultsRegistry::new();
        let mut prefs = store(&registry);

        prefs.set_default("volume", "50");
        prefs.set("volume", "80");
        assert_eq!(prefs.get("volume").unwrap(), "80");
    }

    #[test]
    fn test_default_fills_in_for_missing_value() {
        let registry = DefaultsRegistry::new();
        let prefs = store(&registry);

        prefs.set_default("volume", "50");
        assert_eq!(prefs.get("volume").unwrap(), "50");
    }

    #[test]
    fn test_get_without_value_or_default_is_an_error() {
        let registry = DefaultsRegistry::new();
        let prefs = store(&registry);

        let err = prefs.get("volume").unwrap_err();
        assert_eq!(
            err,
            PrefsError::NoValue {
                key: "volume".to_string()
            }
        );
    }

    #[test]
    fn test_empty_string_is_a_real_value() {
        let registry = DefaultsRegistry::new();
        let mut prefs = store(&registry);

        // An empty stored value must not be mistaken for absence.
        prefs.set_default("greeting", "hello");
        prefs.set("greeting", "");
        assert_eq!(prefs.get("greeting").unwrap(), "");
    }

    #[test]
    fn test_control_characters_are_ordinary_values() {
        let registry = DefaultsRegistry::new();
        let mut prefs = store(&registry);

        // No reserved sentinel: even a NUL byte is a storable value.
        prefs.set("marker", "\0");
        assert_eq!(prefs.get("marker").unwrap(), "\0");
    }

    #[test]
    fn test_reset_removes_the_stored_value() {
        let registry = DefaultsRegistry::new();
        let mut prefs = store(&registry);

        prefs.set_default("volume", "50");
        prefs.set("volume", "80");
        prefs.reset_to_default("volume").unwrap();
        assert_eq!(prefs.get("volume").unwrap(), "50");
    }

    #[test]
    fn test_reset_without_default_is_an_error() {
        let registry = DefaultsRegistry::new();
        let mut prefs = store(&registry);

        prefs.set("volume", "80");
        let err = prefs.reset_to_default("volume").unwrap_err();
        assert_eq!(
            err,
            PrefsError::NoDefault {
                key: "volume".to_string()
            }
        );

        // The stored value survives the failed reset.
        assert_eq!(prefs.get("volume").unwrap(), "80");
    }

    #[test]
    fn test_reset_all_spares_keys_without_defaults() {
        let registry = DefaultsRegistry::new();
        let mut prefs = store(&registry);

        prefs.set_default("volume", "50");
        prefs.set("volume", "80");
        prefs.set("session", "abc123");

        prefs.reset_all_to_defaults();

        assert_eq!(prefs.get("volume").unwrap(), "50");
        // No default for "session", so its stored value stays.
        assert_eq!(prefs.get("session").unwrap(), "abc123");
    }

    #[test]
    fn test_defaults_are_shared_between_instances() {
        let registry = DefaultsRegistry::new();
        let first = store(&registry);
        let second = store(&registry);

        first.set_default("volume", "50");
        assert_eq!(second.get("volume").unwrap(), "50");
    }

    #[test]
    fn test_stored_values_are_per_backend() {
        let registry = DefaultsRegistry::new();
        let mut first = store(&registry);
        let second = store(&registry);

        first.set("volume", "80");
        assert!(second.get("volume").is_err());
    }

    #[test]
    fn test_ids_keep_their_own_defaults() {
        let registry = DefaultsRegistry::new();
        let player = Prefs::open("player", MemoryBackend::new(), &registry);
        let editor = Prefs::open("editor", MemoryBackend::new(), &registry);

        player.set_default("volume", "50");
        assert!(editor.get("volume").is_err());
    }
}
