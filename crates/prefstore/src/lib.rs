//! # prefstore
//!
//! Key/value preference storage with runtime defaults:
//! - String values stored through a pluggable [`SettingsBackend`]
//! - Per-identifier default tables shared between store instances
//! - Reset support that falls back to defaults instead of erasing them
//! - In-memory and JSON file backends included
//!
//! Stored values and defaults are kept apart. Writing a value never
//! touches the defaults, registering a default never touches the stored
//! values, and resetting a key just removes its stored value so the
//! default shows through again.
//!
//! ## Example
//!
//! ```rust
//! use prefstore::{DefaultsRegistry, MemoryBackend, Prefs};
//!
//! let registry = DefaultsRegistry::new();
//! let mut prefs = Prefs::open("player", MemoryBackend::new(), &registry);
//!
//! prefs.set_default("volume", "50");
//! prefs.set("volume", "80");
//!
//! assert_eq!(prefs.get("volume").unwrap(), "80");
//! prefs.reset_to_default("volume").unwrap();
//! assert_eq!(prefs.get("volume").unwrap(), "50");
//! ```

#![deny(missing_docs)]

pub mod backend;
pub mod error;
pub mod registry;
pub mod store;

// Re-export main types
pub use backend::{JsonFileBackend, MemoryBackend, SettingsBackend};
pub use error::{PrefsError, Result};
pub use registry::DefaultsRegistry;
pub use store::Prefs;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
