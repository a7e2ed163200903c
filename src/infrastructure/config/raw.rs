//! Intermediate, all-optional view of the configuration file.
//!
//! The YAML document and the override variables are layered with figment and
//! extracted into these sections. Only then is every remaining gap filled
//! with a built-in default and the result converted into
//! [`AppSettings`](crate::domain::models::AppSettings).

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;

use super::de;
use crate::domain::models::settings::{
    self as defaults, AppSettings, BusSettings, SinkDbSettings, SourceDbSettings,
};
use crate::domain::models::SerializableSecretString;

/// Override variables and the `section.field` key each one sets.
pub const ENV_KEYS: [(&str, &str); 24] = [
    ("POSTGRES_HOST", "postgres.host"),
    ("POSTGRES_PORT", "postgres.port"),
    ("POSTGRES_DB", "postgres.database"),
    ("POSTGRES_USER", "postgres.user"),
    ("POSTGRES_PASSWORD", "postgres.password"),
    ("POSTGRES_REPLICATION_SLOT", "postgres.replication_slot"),
    ("POSTGRES_PUBLICATION", "postgres.publication"),
    ("KAFKA_BOOTSTRAP_SERVERS", "kafka.bootstrap_servers"),
    ("KAFKA_TOPIC", "kafka.topic"),
    ("KAFKA_GROUP_ID", "kafka.group_id"),
    ("KAFKA_AUTO_OFFSET_RESET", "kafka.auto_offset_reset"),
    ("KAFKA_SESSION_TIMEOUT_MS", "kafka.session_timeout_ms"),
    ("KAFKA_MAX_POLL_INTERVAL_MS", "kafka.max_poll_interval_ms"),
    ("CASSANDRA_HOSTS", "cassandra.hosts"),
    ("CASSANDRA_PORT", "cassandra.port"),
    ("CASSANDRA_KEYSPACE", "cassandra.keyspace"),
    ("CASSANDRA_REPLICATION_FACTOR", "cassandra.replication_factor"),
    ("CASSANDRA_USERNAME", "cassandra.username"),
    ("CASSANDRA_PASSWORD", "cassandra.password"),
    ("LOG_LEVEL", "app.log_level"),
    ("METRICS_PORT", "app.metrics_port"),
    ("HEALTH_CHECK_PORT", "app.health_check_port"),
    ("MAX_RETRIES", "app.max_retries"),
    ("RETRY_BACKOFF_SECONDS", "app.retry_backoff_seconds"),
];

/// Variable that sets the dotted configuration `key`, if any.
pub fn env_var_for(key: &str) -> Option<&'static str> {
    ENV_KEYS
        .iter()
        .find(|(_, path)| key == *path || key.ends_with(&format!(".{path}")))
        .map(|(var, _)| *var)
}

/// Whole configuration document as written in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RawConfig {
    pub postgres: Option<RawSourceDb>,
    pub kafka: Option<RawBus>,
    pub cassandra: Option<RawSinkDb>,
    pub app: Option<RawApp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RawSourceDb {
    #[serde(deserialize_with = "de::text")]
    pub host: Option<String>,
    #[serde(deserialize_with = "de::integer")]
    pub port: Option<i64>,
    #[serde(deserialize_with = "de::text")]
    pub database: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub user: Option<String>,
    #[serde(deserialize_with = "de::secret")]
    pub password: Option<SerializableSecretString>,
    #[serde(deserialize_with = "de::text")]
    pub replication_slot: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub publication: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RawBus {
    #[serde(deserialize_with = "de::text")]
    pub bootstrap_servers: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub topic: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub group_id: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub auto_offset_reset: Option<String>,
    pub enable_auto_commit: Option<bool>,
    #[serde(deserialize_with = "de::integer_or_empty")]
    pub session_timeout_ms: Option<u64>,
    #[serde(deserialize_with = "de::integer_or_empty")]
    pub max_poll_interval_ms: Option<u64>,
    #[serde(deserialize_with = "de::text")]
    pub compression_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RawSinkDb {
    #[serde(deserialize_with = "de::hosts")]
    pub hosts: Option<Vec<String>>,
    #[serde(deserialize_with = "de::integer")]
    pub port: Option<i64>,
    #[serde(deserialize_with = "de::text")]
    pub keyspace: Option<String>,
    #[serde(deserialize_with = "de::integer")]
    pub replication_factor: Option<i64>,
    #[serde(deserialize_with = "de::text")]
    pub username: Option<String>,
    #[serde(deserialize_with = "de::secret")]
    pub password: Option<SerializableSecretString>,
    #[serde(deserialize_with = "de::integer")]
    pub protocol_version: Option<u8>,
    #[serde(deserialize_with = "de::text")]
    pub consistency_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RawApp {
    #[serde(deserialize_with = "de::text")]
    pub log_level: Option<String>,
    #[serde(deserialize_with = "de::integer")]
    pub metrics_port: Option<i64>,
    #[serde(deserialize_with = "de::integer")]
    pub health_check_port: Option<i64>,
    #[serde(deserialize_with = "de::integer")]
    pub max_retries: Option<i64>,
    #[serde(deserialize_with = "de::integer")]
    pub retry_backoff_seconds: Option<i64>,
}

/// The YAML document as a figment layer. A document that is empty or holds
/// only comments contributes nothing.
pub fn file_layer(content: &str) -> Figment {
    let is_empty = matches!(
        serde_yaml::from_str::<serde_yaml::Value>(content),
        Ok(serde_yaml::Value::Null)
    );
    if is_empty {
        Figment::new()
    } else {
        Figment::from(Yaml::string(content))
    }
}

/// The override variables from the process environment, renamed to their
/// configuration keys. Every other variable is ignored.
pub fn env_layer() -> Env {
    Env::raw().filter_map(|var| {
        ENV_KEYS
            .iter()
            .find(|(name, _)| var.as_str() == *name)
            .map(|(_, key)| (*key).into())
    })
}

/// Splits a comma-separated host list, trimming entries and dropping empty ones.
pub fn split_hosts(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(ToString::to_string)
        .collect()
}

impl RawConfig {
    /// Extracts the document alone.
    pub fn from_document(content: &str) -> Result<Self, figment::Error> {
        file_layer(content).extract()
    }

    /// Extracts the document with the override variables merged on top.
    /// Sections missing from the document are created by any variable that targets them.
    pub fn from_document_with_env(content: &str) -> Result<Self, figment::Error> {
        file_layer(content).merge(env_layer()).extract()
    }

    /// Fills every absent field with its built-in default and builds the final settings.
    pub fn into_settings(self) -> AppSettings {
        let app = self.app.unwrap_or_default();

        AppSettings {
            postgres: self.postgres.unwrap_or_default().into_settings(),
            kafka: self.kafka.unwrap_or_default().into_settings(),
            cassandra: self.cassandra.unwrap_or_default().into_settings(),
            log_level: app
                .log_level
                .unwrap_or_else(|| defaults::DEFAULT_LOG_LEVEL.as_str().to_string()),
            metrics_port: app.metrics_port.unwrap_or(defaults::DEFAULT_METRICS_PORT),
            health_check_port: app
                .health_check_port
                .unwrap_or(defaults::DEFAULT_HEALTH_CHECK_PORT),
            max_retries: app.max_retries.unwrap_or(defaults::DEFAULT_MAX_RETRIES),
            retry_backoff_seconds: app
                .retry_backoff_seconds
                .unwrap_or(defaults::DEFAULT_RETRY_BACKOFF_SECONDS),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

impl RawSourceDb {
    fn into_settings(self) -> SourceDbSettings {
        SourceDbSettings {
            host: or_default(self.host, defaults::DEFAULT_POSTGRES_HOST),
            port: self.port.unwrap_or(defaults::DEFAULT_POSTGRES_PORT),
            database: or_default(self.database, defaults::DEFAULT_POSTGRES_DATABASE),
            user: or_default(self.user, defaults::DEFAULT_POSTGRES_USER),
            password: self
                .password
                .unwrap_or_else(|| defaults::DEFAULT_POSTGRES_PASSWORD.into()),
            replication_slot: or_default(self.replication_slot, defaults::DEFAULT_REPLICATION_SLOT),
            publication: or_default(self.publication, defaults::DEFAULT_PUBLICATION),
        }
    }
}

impl RawBus {
    fn into_settings(self) -> BusSettings {
        BusSettings {
            bootstrap_servers: or_default(
                self.bootstrap_servers,
                defaults::DEFAULT_BOOTSTRAP_SERVERS,
            ),
            topic: or_default(self.topic, defaults::DEFAULT_TOPIC),
            group_id: or_default(self.group_id, defaults::DEFAULT_GROUP_ID),
            auto_offset_reset: or_default(
                self.auto_offset_reset,
                defaults::DEFAULT_OFFSET_RESET.as_str(),
            ),
            enable_auto_commit: self.enable_auto_commit.unwrap_or(false),
            session_timeout_ms: self
                .session_timeout_ms
                .unwrap_or(defaults::DEFAULT_SESSION_TIMEOUT_MS),
            max_poll_interval_ms: self
                .max_poll_interval_ms
                .unwrap_or(defaults::DEFAULT_MAX_POLL_INTERVAL_MS),
            compression_type: or_default(self.compression_type, defaults::DEFAULT_COMPRESSION_TYPE),
        }
    }
}

impl RawSinkDb {
    fn into_settings(self) -> SinkDbSettings {
        SinkDbSettings {
            hosts: self
                .hosts
                .unwrap_or_else(|| vec![defaults::DEFAULT_CASSANDRA_HOST.to_string()]),
            port: self.port.unwrap_or(defaults::DEFAULT_CASSANDRA_PORT),
            keyspace: or_default(self.keyspace, defaults::DEFAULT_KEYSPACE),
            replication_factor: self
                .replication_factor
                .unwrap_or(defaults::DEFAULT_REPLICATION_FACTOR),
            username: self.username,
            password: self.password,
            protocol_version: self
                .protocol_version
                .unwrap_or(defaults::DEFAULT_PROTOCOL_VERSION),
            consistency_level: or_default(
                self.consistency_level,
                defaults::DEFAULT_CONSISTENCY_LEVEL,
            ),
        }
    }
}

/// Runs `f` with exactly the given override variables set and every other
/// override variable unset.
#[cfg(test)]
pub(crate) fn with_env<R>(set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let vars: Vec<(&str, Option<&str>)> = ENV_KEYS
        .iter()
        .map(|(name, _)| {
            let value = set.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
            (*name, value)
        })
        .collect();

    temp_env::with_vars(vars, f)
}
