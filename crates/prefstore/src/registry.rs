//! Registry of shared default values, keyed by store identifier
//!
//! Defaults are not persisted with the stored values; they are registered
//! at runtime and shared between every [`Prefs`](crate::Prefs) instance
//! opened with the same identifier against the same registry. The registry
//! is an ordinary value owned by the caller, so separate registries stay
//! fully isolated from each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Default values for one store identifier, shared between instances
pub(crate) type SharedDefaults = Arc<Mutex<HashMap<String, String>>>;

/// Holds the default-value tables for every store identifier seen so far
///
/// Each identifier maps to one table of defaults. The table is created
/// empty the first time the identifier is opened and the same table is
/// handed to every later open with that identifier, so defaults registered
/// through one [`Prefs`](crate::Prefs) instance are visible to all of its
/// siblings.
///
/// # Example
///
/// ```rust
/// use prefstore::{DefaultsRegistry, MemoryBackend, Prefs};
///
/// let registry = DefaultsRegistry::new();
///
/// let first = Prefs::open("player", MemoryBackend::new(), &registry);
/// first.set_default("volume", "50");
///
/// // A second instance with the same id sees the same defaults.
/// let second = Prefs::open("player", MemoryBackend::new(), &registry);
/// assert_eq!(second.get("volume").unwrap(), "50");
/// ```
#[derive(Debug, Default)]
pub struct DefaultsRegistry {
    /// Default tables by store identifier
    tables: Mutex<HashMap<String, SharedDefaults>>,
}

impl DefaultsRegistry {
    /// Create a registry with no identifiers registered yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the defaults table for an identifier, creating an empty one
    /// on first use
    pub(crate) fn defaults_for(&self, id: &str) -> SharedDefaults {
        let mut tables = self.tables.lock().expect("defaults registry lock poisoned");
        tables
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!("registering defaults table for '{}'", id);
                Arc::new(Mutex::new(HashMap::new()))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_shares_one_table() {
        let registry = DefaultsRegistry::new();

        let first = registry.defaults_for("player");
        first
            .lock()
            .unwrap()
            .insert("volume".to_string(), "50".to_string());

        let second = registry.defaults_for("player");
        assert_eq!(
            second.lock().unwrap().get("volume").map(String::as_str),
            Some("50")
        );
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_different_ids_are_isolated() {
        let registry = DefaultsRegistry::new();

        registry
            .defaults_for("player")
            .lock()
            .unwrap()
            .insert("volume".to_string(), "50".to_string());

        let other = registry.defaults_for("editor");
        assert!(other.lock().unwrap().is_empty());
    }

    #[test]
    fn test_separate_registries_are_isolated() {
        let one = DefaultsRegistry::new();
        let two = DefaultsRegistry::new();

        one.defaults_for("player")
            .lock()
            .unwrap()
            .insert("volume".to_string(), "50".to_string());

        assert!(two.defaults_for("player").lock().unwrap().is_empty());
    }
}
