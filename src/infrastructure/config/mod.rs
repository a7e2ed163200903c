//! Configuration management infrastructure
//!
//! Layered configuration for the replication pipeline:
//! - YAML file loading with a fallback to `config/app.yaml`
//! - Environment variable overrides, layered with figment
//! - Built-in defaults for anything still unset
//! - Validation that reports every violation
//! - A cached, reloadable shared instance

mod de;
pub mod loader;
pub mod provider;
pub mod raw;

pub use loader::{load_settings, ConfigError, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use provider::{get_settings, global_provider, reload_settings, SettingsProvider};
pub use raw::{RawConfig, ENV_KEYS};
