use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use figment::providers::Env;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::raw::{env_layer, env_var_for, RawConfig};
use crate::domain::models::{AppSettings, ValidationError};

/// Conventional configuration location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found: {} (also tried {})",
        .requested.display(),
        .fallback.display()
    )]
    NotFound { requested: PathBuf, fallback: PathBuf },

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML configuration {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: figment::Error,
    },

    #[error("Invalid value for environment variable {var}: '{value}' ({reason})")]
    InvalidEnvOverride {
        var: String,
        value: String,
        reason: String,
    },

    #[error("{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl ConfigError {
    /// The individual violations, when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Blames an extraction failure of the merged layers on the variable
    /// that set the offending key. The document alone has already been
    /// extracted successfully at this point.
    fn from_env_error(err: &figment::Error) -> Self {
        let key = err.path.join(".");
        let var = env_var_for(&key).map_or(key, ToString::to_string);
        let value = Env::var(&var).unwrap_or_default();

        Self::InvalidEnvOverride {
            var,
            value,
            reason: err.kind.to_string(),
        }
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    let mut message = String::from("Configuration validation failed:");
    for error in errors {
        let _ = write!(message, "\n  - {error}");
    }
    message
}

/// Loads [`AppSettings`] from a YAML file with environment variable overrides.
///
/// Precedence (lowest to highest):
/// 1. Built-in defaults
/// 2. The YAML file
/// 3. Environment variables (`POSTGRES_*`, `KAFKA_*`, `CASSANDRA_*`, app-level names)
///
/// The loader holds no parsed state; every call to [`ConfigLoader::load`]
/// re-reads the file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    fallback: PathBuf,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigLoader {
    /// Create a loader for `path`, falling back to [`DEFAULT_CONFIG_PATH`]
    /// when `path` does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    // TODO: drop the implicit fallback once deployments pass explicit config paths.
    /// Replace the fallback location tried when the configured path is missing.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<PathBuf>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fallback(&self) -> &Path {
        &self.fallback
    }

    /// Load, override, construct and validate.
    ///
    /// # Arguments
    /// * `apply_env_overrides` - Whether environment variables are layered over the file
    pub fn load(&self, apply_env_overrides: bool) -> Result<AppSettings, ConfigError> {
        let path = self.resolve_path()?;

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // The document is extracted on its own first so a bad file is
        // reported as a parse error and never blamed on the environment.
        let mut raw = RawConfig::from_document(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded configuration");

        if apply_env_overrides {
            raw = RawConfig::from_document_with_env(&content)
                .map_err(|err| ConfigError::from_env_error(&err))?;

            let applied: Vec<String> = env_layer()
                .iter()
                .map(|(key, _)| key.as_str().to_string())
                .collect();
            if !applied.is_empty() {
                debug!(keys = ?applied, "applied environment overrides");
            }
        }

        let settings = raw.into_settings();

        let errors = settings.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(settings)
    }

    fn resolve_path(&self) -> Result<&Path, ConfigError> {
        if self.path.exists() {
            return Ok(&self.path);
        }

        if self.fallback.exists() {
            warn!(
                requested = %self.path.display(),
                fallback = %self.fallback.display(),
                "configuration file not found, using fallback location"
            );
            return Ok(&self.fallback);
        }

        Err(ConfigError::NotFound {
            requested: self.path.clone(),
            fallback: self.fallback.clone(),
        })
    }
}

/// Load settings from `path` in one call.
pub fn load_settings(
    path: impl Into<PathBuf>,
    apply_env_overrides: bool,
) -> Result<AppSettings, ConfigError> {
    ConfigLoader::new(path).load(apply_env_overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::raw::with_env;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const VALID: &str = r"
postgres:
  host: testhost
  port: 5432
  database: testdb
  user: testuser
  password: testpass
  replication_slot: test_slot
kafka:
  bootstrap_servers: testkafka:9092
  topic: test.topic
  group_id: test-group
cassandra:
  hosts: [testcassandra]
  port: 9042
  keyspace: testks
  replication_factor: 3
app:
  log_level: DEBUG
  metrics_port: 9091
  health_check_port: 8081
";

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// Loader whose fallback cannot exist, so a missing file is always an error.
    fn isolated(path: &Path, dir: &TempDir) -> ConfigLoader {
        ConfigLoader::new(path).with_fallback(dir.path().join("missing.yaml"))
    }

    #[test]
    fn test_load_yaml_without_overrides() {
        let file = write_config(VALID);
        let dir = TempDir::new().unwrap();

        let settings = isolated(file.path(), &dir).load(false).unwrap();

        assert_eq!(settings.postgres.host, "testhost");
        assert_eq!(settings.kafka.bootstrap_servers, "testkafka:9092");
        assert_eq!(settings.cassandra.hosts, ["testcassandra"]);
        assert_eq!(settings.log_level, "DEBUG");
        assert_eq!(settings.metrics_port, 9091);
        assert_eq!(settings.max_retries, 5);
    }

    #[test]
    fn test_load_with_overrides() {
        let file = write_config(VALID);
        let dir = TempDir::new().unwrap();
        let vars = [
            ("POSTGRES_HOST", "envhost"),
            ("KAFKA_TOPIC", "env.topic"),
            ("CASSANDRA_HOSTS", "env1,env2"),
            ("LOG_LEVEL", "ERROR"),
        ];

        let settings = with_env(&vars, || isolated(file.path(), &dir).load(true)).unwrap();

        assert_eq!(settings.postgres.host, "envhost");
        assert_eq!(settings.kafka.topic, "env.topic");
        assert_eq!(settings.cassandra.hosts, ["env1", "env2"]);
        assert_eq!(settings.log_level, "ERROR");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("nonexistent/config.yaml");

        let err = isolated(&requested, &dir).load(false).unwrap_err();

        match &err {
            ConfigError::NotFound { requested: r, fallback } => {
                assert_eq!(r, &requested);
                assert_eq!(fallback, &dir.path().join("missing.yaml"));
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("nonexistent/config.yaml"));
        assert!(message.contains("missing.yaml"));
    }

    #[test]
    fn test_fallback_is_used_when_path_missing() {
        let fallback = write_config(VALID);
        let dir = TempDir::new().unwrap();

        let settings = ConfigLoader::new(dir.path().join("absent.yaml"))
            .with_fallback(fallback.path())
            .load(false)
            .unwrap();

        assert_eq!(settings.postgres.host, "testhost");
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let file = write_config("postgres:\n  host: [unclosed\n");
        let dir = TempDir::new().unwrap();

        let err = isolated(file.path(), &dir).load(false).unwrap_err();

        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("Expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let dir = TempDir::new().unwrap();

        let settings = isolated(file.path(), &dir).load(false).unwrap();

        assert_eq!(settings.postgres.host, "localhost");
        assert_eq!(settings.cassandra.keyspace, "sinkdb");
    }

    #[test]
    fn test_missing_app_section_is_synthesized() {
        let file = write_config("postgres:\n  host: filehost\n");
        let dir = TempDir::new().unwrap();
        let settings = with_env(&[("METRICS_PORT", "9500")], || {
            isolated(file.path(), &dir).load(true)
        })
        .unwrap();

        assert_eq!(settings.log_level, "INFO");
        assert_eq!(settings.metrics_port, 9500);
        assert_eq!(settings.health_check_port, 8080);
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.retry_backoff_seconds, 2);
    }

    #[test]
    fn test_invalid_offset_reset_is_validation_error() {
        let file = write_config(&VALID.replace(
            "group_id: test-group",
            "group_id: test-group\n  auto_offset_reset: sometimes",
        ));
        let dir = TempDir::new().unwrap();

        let err = isolated(file.path(), &dir).load(false).unwrap_err();

        assert_eq!(
            err.validation_errors(),
            Some(&[ValidationError::InvalidOffsetReset("sometimes".to_string())][..])
        );
        let message = err.to_string();
        assert!(message.starts_with("Configuration validation failed:"));
        assert!(message.contains("earliest"));
        assert!(message.contains("latest"));
        assert!(message.contains("none"));
    }

    #[test]
    fn test_validation_lists_every_error_on_its_own_line() {
        let file = write_config(
            "postgres:\n  host: ''\n  port: 99999\ncassandra:\n  keyspace: ''\napp:\n  max_retries: -1\n",
        );
        let dir = TempDir::new().unwrap();

        let err = isolated(file.path(), &dir).load(false).unwrap_err();

        let lines: Vec<_> = err.to_string().lines().map(str::to_string).collect();
        assert_eq!(
            lines,
            [
                "Configuration validation failed:",
                "  - Invalid PostgreSQL port: 99999",
                "  - PostgreSQL host cannot be empty",
                "  - Cassandra keyspace cannot be empty",
                "  - Invalid max_retries: -1. Must be >= 0",
            ]
        );
    }

    #[test]
    fn test_env_can_make_config_invalid() {
        let file = write_config(VALID);
        let dir = TempDir::new().unwrap();
        let err = with_env(&[("KAFKA_AUTO_OFFSET_RESET", "never")], || {
            isolated(file.path(), &dir).load(true)
        })
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_negative_env_port_is_validation_error() {
        let file = write_config(VALID);
        let dir = TempDir::new().unwrap();

        let err = with_env(&[("METRICS_PORT", "-1")], || {
            isolated(file.path(), &dir).load(true)
        })
        .unwrap_err();

        assert_eq!(
            err.validation_errors(),
            Some(&[ValidationError::InvalidMetricsPort(-1)][..])
        );
    }

    #[test]
    fn test_negative_replication_factor_is_listed_with_other_errors() {
        let file = write_config("cassandra:\n  replication_factor: -1\n  keyspace: ''\n");
        let dir = TempDir::new().unwrap();

        let err = isolated(file.path(), &dir).load(false).unwrap_err();

        assert_eq!(
            err.validation_errors(),
            Some(
                &[
                    ValidationError::EmptyKeyspace,
                    ValidationError::InvalidReplicationFactor(-1),
                ][..]
            )
        );
        assert!(err
            .to_string()
            .contains("Invalid replication factor: -1. Must be >= 1"));
    }

    #[test]
    fn test_unparseable_env_value_names_the_variable() {
        let file = write_config(VALID);
        let dir = TempDir::new().unwrap();

        let err = with_env(&[("CASSANDRA_PORT", "ninety")], || {
            isolated(file.path(), &dir).load(true)
        })
        .unwrap_err();

        match err {
            ConfigError::InvalidEnvOverride { var, value, .. } => {
                assert_eq!(var, "CASSANDRA_PORT");
                assert_eq!(value, "ninety");
            }
            other => panic!("Expected InvalidEnvOverride, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_file_is_parse_error_even_with_env() {
        let file = write_config("postgres:\n  port: abc\n");
        let dir = TempDir::new().unwrap();

        let err = with_env(&[("POSTGRES_PORT", "5432")], || {
            isolated(file.path(), &dir).load(true)
        })
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn test_each_load_rereads_the_file() {
        let file = write_config(VALID);
        let dir = TempDir::new().unwrap();
        let loader = isolated(file.path(), &dir);

        assert_eq!(loader.load(false).unwrap().postgres.host, "testhost");

        std::fs::write(file.path(), "postgres:\n  host: changed\n").unwrap();

        assert_eq!(loader.load(false).unwrap().postgres.host, "changed");
    }

    #[test]
    fn test_load_settings_helper() {
        let file = write_config(VALID);
        let settings = load_settings(file.path(), false).unwrap();
        assert_eq!(settings.kafka.group_id, "test-group");
    }
}
