//! Process-wide settings merged from defaults, `gem.conf` files and legacy
//! environment variables.
//!
//! [`Settings`] is a plain value produced by [`Settings::load`], which folds an
//! ordered list of [`ConfigSource`]s into one map, later sources overwriting
//! earlier ones. The free functions [`get`], [`set`] and [`with_settings`]
//! give every component the same lazily-loaded view without threading a
//! settings object through each constructor.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::atom::Atom;
use crate::config_file;
use crate::paths;

/// Legacy environment variables and the keys they set.
pub const LEGACY_ENV: &[(&str, &str)] = &[
    ("GEM_RECTANGLE_TEXTURE", "texture.rectangle"),
    ("GEM_SINGLE_CONTEXT", "singlecontext"),
    ("GEM_DEFAULT_FONT", "font.face"),
];

/// One layer of configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in default values.
    Defaults,
    /// A `gem.conf` file. Missing or unreadable files contribute nothing.
    File(PathBuf),
    /// The [`LEGACY_ENV`] variables.
    Environment,
}

impl ConfigSource {
    /// Returns the standard layering: defaults, each platform directory, the
    /// working directory, then the environment.
    pub fn standard(env: &dyn Fn(&str) -> Option<String>) -> Vec<Self> {
        let mut sources = vec![ConfigSource::Defaults];
        sources.extend(
            paths::settings_files(env)
                .into_iter()
                .map(ConfigSource::File),
        );
        sources.push(ConfigSource::Environment);
        sources
    }
}

/// A merged key/value view of the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, Atom>,
}

impl Settings {
    /// Creates an empty settings map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in defaults.
    #[must_use]
    pub fn defaults() -> Self {
        let mut settings = Self::new();
        settings.set("font.face", Atom::symbol("vera.ttf"));
        settings.set("texture.rectangle", Atom::Float(1.0));
        settings.set("singlecontext", Atom::Float(0.0));
        settings
    }

    /// Merges `sources` in order, later sources winning on key collisions.
    ///
    /// Sources that cannot be read are skipped; loading never fails.
    pub fn load(sources: &[ConfigSource], env: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::new();
        for source in sources {
            match source {
                ConfigSource::Defaults => settings.merge(Self::defaults()),
                ConfigSource::File(path) => {
                    if let Err(e) = settings.read_file(path) {
                        log::debug!("settings: skipping '{}': {e}", path.display());
                    }
                }
                ConfigSource::Environment => settings.read_env(env),
            }
        }
        for (key, value) in &settings.values {
            log::debug!("settings: key ['{key}']: {value}");
        }
        settings
    }

    /// Loads the standard layering from the real filesystem and environment.
    #[must_use]
    pub fn load_standard() -> Self {
        let env = |name: &str| std::env::var(name).ok();
        Self::load(&ConfigSource::standard(&env), &env)
    }

    /// Applies every statement of a `gem.conf` file.
    pub fn read_file(&mut self, path: &std::path::Path) -> std::io::Result<()> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("settings: reading '{}'", path.display());
        for (key, value) in config_file::parse(&text) {
            self.set(key, value);
        }
        Ok(())
    }

    /// Applies the legacy environment variables that are set.
    pub fn read_env(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        for (var, key) in LEGACY_ENV {
            if let Some(raw) = env(var) {
                self.set(*key, Atom::parse(&raw));
            }
        }
    }

    /// Overwrites entries with those of `other`.
    pub fn merge(&mut self, other: Settings) {
        self.values.extend(other.values);
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Atom> {
        self.values.get(key)
    }

    /// Returns the value for `key` if it is numeric.
    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Atom::as_float)
    }

    /// Returns the value for `key` if it is a symbol.
    #[must_use]
    pub fn get_symbol(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Atom::as_symbol)
    }

    /// Inserts or overwrites a value.
    pub fn set(&mut self, key: impl Into<String>, value: Atom) {
        self.values.insert(key.into(), value);
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Atom)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serializes the merged view as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.values)
    }
}

static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();

fn global() -> &'static RwLock<Settings> {
    SETTINGS.get_or_init(|| {
        log::info!("settings: loading configuration");
        RwLock::new(Settings::load_standard())
    })
}

/// Returns whether the process-wide settings have been loaded.
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}

/// Reads the process-wide settings, loading them on first use.
pub fn with_settings<F, R>(f: F) -> R
where
    F: FnOnce(&Settings) -> R,
{
    let guard = global().read().unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

/// Returns a process-wide setting, loading the settings on first use.
pub fn get(key: &str) -> Option<Atom> {
    with_settings(|s| s.get(key).cloned())
}

/// Sets a process-wide setting for the rest of the process lifetime.
///
/// The value is not written back to any file.
pub fn set(key: impl Into<String>, value: Atom) {
    let mut guard = global().write().unwrap_or_else(PoisonError::into_inner);
    guard.set(key, value);
}
