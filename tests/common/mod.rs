//! Common test utilities for integration tests
//!
//! Provides YAML fixtures and environment helpers shared across the
//! integration test files.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

use sentinelsync::infrastructure::config::raw::ENV_KEYS;
use sentinelsync::ConfigLoader;

/// A complete, valid configuration document.
pub const VALID_CONFIG: &str = r"
postgres:
  host: filehost
  port: 5432
  database: testdb
  user: testuser
  password: testpass
  replication_slot: test_slot
kafka:
  bootstrap_servers: testkafka:9092
  topic: file.topic
  group_id: test-group
cassandra:
  hosts: [file1, file2]
  port: 9042
  keyspace: fileks
  replication_factor: 3
app:
  log_level: DEBUG
  metrics_port: 9091
  health_check_port: 8081
";

/// Write `content` to a temporary YAML file.
pub fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config");
    file.flush().expect("Failed to flush temp config");
    file
}

/// A fallback path inside `dir` that never exists.
pub fn missing_fallback(dir: &TempDir) -> PathBuf {
    dir.path().join("no-such-fallback.yaml")
}

/// Loader for `path` that cannot fall back to the repository's `config/app.yaml`.
pub fn isolated_loader(path: &Path, dir: &TempDir) -> ConfigLoader {
    ConfigLoader::new(path).with_fallback(missing_fallback(dir))
}

/// Run `f` with exactly the given override variables set and every other
/// override variable unset.
pub fn with_overrides<R>(set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let vars: Vec<(&str, Option<&str>)> = ENV_KEYS
        .iter()
        .map(|(name, _)| {
            let value = set.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
            (*name, value)
        })
        .collect();

    temp_env::with_vars(vars, f)
}
