//! SentinelSync - replication service configuration
//!
//! Typed configuration for a Postgres change-data-capture pipeline that
//! publishes to Kafka and writes into Cassandra. Settings are read from a
//! YAML file, overridden by environment variables, filled with built-in
//! defaults and validated as a whole before anyone sees them.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): settings value types and validation rules
//! - **Infrastructure Layer** (`infrastructure`): file and environment loading,
//!   the shared settings cache, logging setup
//! - **CLI Layer** (`cli`): operator commands
//!
//! # Example
//!
//! ```no_run
//! use sentinelsync::{get_settings, reload_settings};
//!
//! let settings = get_settings(None, false)?;
//! println!("{}", settings.postgres.connection_string());
//!
//! let fresh = reload_settings(None)?;
//! assert!(!std::sync::Arc::ptr_eq(&settings, &fresh));
//! # Ok::<(), sentinelsync::ConfigError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    AppSettings, BusSettings, LogLevel, OffsetReset, SerializableSecretString, SinkDbSettings,
    SourceDbSettings, ValidationError,
};
pub use infrastructure::config::{
    get_settings, global_provider, load_settings, reload_settings, ConfigError, ConfigLoader,
    SettingsProvider, DEFAULT_CONFIG_PATH,
};
