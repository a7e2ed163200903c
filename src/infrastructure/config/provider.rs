//! Shared access to one loaded [`AppSettings`] instance.
//!
//! [`SettingsProvider`] is an ordinary value that can be constructed and
//! handed to collaborators. For code that wants a process-wide instance,
//! [`global_provider`] lazily creates one bound to the default path, and
//! [`get_settings`] / [`reload_settings`] are the only ways to change what it
//! holds.

use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::info;

use super::loader::{ConfigError, ConfigLoader};
use crate::domain::models::AppSettings;

static GLOBAL_PROVIDER: OnceLock<SettingsProvider> = OnceLock::new();

/// Caches one validated configuration and reloads it on request.
///
/// Loads are serialized through the loader mutex so at most one runs at a
/// time. The cached `Arc` is published only after a load succeeds, so readers
/// never see a partially built value, and readers of an already cached value
/// only take the shared read lock.
#[derive(Debug)]
pub struct SettingsProvider {
    loader: Mutex<ConfigLoader>,
    current: RwLock<Option<Arc<AppSettings>>>,
    apply_env_overrides: bool,
}

impl Default for SettingsProvider {
    fn default() -> Self {
        Self::new(ConfigLoader::default())
    }
}

impl SettingsProvider {
    /// Provider that applies environment overrides on every load.
    pub fn new(loader: ConfigLoader) -> Self {
        Self {
            loader: Mutex::new(loader),
            current: RwLock::new(None),
            apply_env_overrides: true,
        }
    }

    /// Provider that reads only the file and built-in defaults.
    pub fn without_env_overrides(loader: ConfigLoader) -> Self {
        Self {
            apply_env_overrides: false,
            ..Self::new(loader)
        }
    }

    /// Return the cached settings, loading them first when nothing is cached,
    /// when `reload` is set, or when a new `path` is given.
    ///
    /// A new `path` replaces the loader before loading, so later calls keep
    /// using it. On failure the previously cached instance stays in place.
    pub fn get(&self, path: Option<&Path>, reload: bool) -> Result<Arc<AppSettings>, ConfigError> {
        let must_load = reload || path.is_some();

        if !must_load {
            if let Some(settings) = self.current() {
                return Ok(settings);
            }
        }

        let mut loader = self.loader.lock();

        // Another caller may have finished loading while we waited.
        if !must_load {
            if let Some(settings) = self.current() {
                return Ok(settings);
            }
        }

        if let Some(path) = path {
            let fallback = loader.fallback().to_path_buf();
            *loader = ConfigLoader::new(path).with_fallback(fallback);
        }

        let settings = Arc::new(loader.load(self.apply_env_overrides)?);
        *self.current.write() = Some(Arc::clone(&settings));

        info!(path = %loader.path().display(), reload, "configuration cached");
        Ok(settings)
    }

    /// Force a fresh load, optionally from a new path.
    pub fn reload(&self, path: Option<&Path>) -> Result<Arc<AppSettings>, ConfigError> {
        self.get(path, true)
    }

    /// The cached settings, without loading.
    pub fn current(&self) -> Option<Arc<AppSettings>> {
        self.current.read().clone()
    }
}

/// The process-wide provider, created on first use with the default loader.
pub fn global_provider() -> &'static SettingsProvider {
    GLOBAL_PROVIDER.get_or_init(SettingsProvider::default)
}

/// Get the process-wide settings, loading them on first access.
///
/// # Arguments
/// * `path` - Optional configuration file; giving one forces a load from it
/// * `reload` - Force a reload even when settings are cached
pub fn get_settings(path: Option<&Path>, reload: bool) -> Result<Arc<AppSettings>, ConfigError> {
    global_provider().get(path, reload)
}

/// Reload the process-wide settings, optionally from a new path.
pub fn reload_settings(path: Option<&Path>) -> Result<Arc<AppSettings>, ConfigError> {
    global_provider().reload(path)
}
