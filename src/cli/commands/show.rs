//! Implementation of the `sentinelsync show` command.

use anyhow::{Context, Result};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AppSettings, OffsetReset};
use crate::infrastructure::config::SettingsProvider;

/// Operator-facing summary of the resolved configuration. Never includes secrets.
#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub postgres: PostgresSummary,
    pub kafka: KafkaSummary,
    pub cassandra: CassandraSummary,
    pub app: AppSummary,
}

#[derive(Debug, Serialize)]
pub struct PostgresSummary {
    pub host: String,
    pub port: i64,
    pub database: String,
    pub user: String,
    pub replication_slot: String,
    pub publication: String,
}

#[derive(Debug, Serialize)]
pub struct KafkaSummary {
    pub bootstrap_servers: String,
    pub topic: String,
    pub group_id: String,
    pub auto_offset_reset: Option<OffsetReset>,
}

#[derive(Debug, Serialize)]
pub struct CassandraSummary {
    pub hosts: Vec<String>,
    pub port: i64,
    pub keyspace: String,
    pub replication_factor: i64,
    pub consistency_level: String,
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct AppSummary {
    pub log_level: String,
    pub metrics_port: i64,
    pub health_check_port: i64,
    pub max_retries: i64,
    pub retry_backoff_seconds: i64,
}

impl From<&AppSettings> for ShowOutput {
    fn from(settings: &AppSettings) -> Self {
        let pg = &settings.postgres;
        let kafka = &settings.kafka;
        let cassandra = &settings.cassandra;

        Self {
            postgres: PostgresSummary {
                host: pg.host.clone(),
                port: pg.port,
                database: pg.database.clone(),
                user: pg.user.clone(),
                replication_slot: pg.replication_slot.clone(),
                publication: pg.publication.clone(),
            },
            kafka: KafkaSummary {
                bootstrap_servers: kafka.bootstrap_servers.clone(),
                topic: kafka.topic.clone(),
                group_id: kafka.group_id.clone(),
                auto_offset_reset: kafka.offset_reset_policy(),
            },
            cassandra: CassandraSummary {
                hosts: cassandra.contact_points().to_vec(),
                port: cassandra.port,
                keyspace: cassandra.keyspace.clone(),
                replication_factor: cassandra.replication_factor,
                consistency_level: cassandra.consistency_level.clone(),
                authenticated: cassandra.credentials().is_some(),
            },
            app: AppSummary {
                log_level: settings.log_level.clone(),
                metrics_port: settings.metrics_port,
                health_check_port: settings.health_check_port,
                max_retries: settings.max_retries,
                retry_backoff_seconds: settings.retry_backoff_seconds,
            },
        }
    }
}

impl ShowOutput {
    fn rows(&self) -> Vec<[String; 3]> {
        let row = |section: &str, key: &str, value: String| {
            [section.to_string(), key.to_string(), value]
        };

        vec![
            row(
                "postgres",
                "endpoint",
                format!("{}:{}", self.postgres.host, self.postgres.port),
            ),
            row("postgres", "database", self.postgres.database.clone()),
            row("postgres", "user", self.postgres.user.clone()),
            row(
                "postgres",
                "replication slot",
                self.postgres.replication_slot.clone(),
            ),
            row("postgres", "publication", self.postgres.publication.clone()),
            row(
                "kafka",
                "bootstrap servers",
                self.kafka.bootstrap_servers.clone(),
            ),
            row("kafka", "topic", self.kafka.topic.clone()),
            row("kafka", "consumer group", self.kafka.group_id.clone()),
            row(
                "kafka",
                "offset reset",
                self.kafka
                    .auto_offset_reset
                    .map_or("unrecognised", OffsetReset::as_str)
                    .to_string(),
            ),
            row("cassandra", "hosts", self.cassandra.hosts.join(", ")),
            row("cassandra", "port", self.cassandra.port.to_string()),
            row("cassandra", "keyspace", self.cassandra.keyspace.clone()),
            row(
                "cassandra",
                "replication factor",
                self.cassandra.replication_factor.to_string(),
            ),
            row(
                "cassandra",
                "consistency",
                self.cassandra.consistency_level.clone(),
            ),
            row(
                "cassandra",
                "auth",
                if self.cassandra.authenticated { "yes" } else { "no" }.to_string(),
            ),
            row("app", "log level", self.app.log_level.clone()),
            row("app", "metrics port", self.app.metrics_port.to_string()),
            row(
                "app",
                "health check port",
                self.app.health_check_port.to_string(),
            ),
            row("app", "max retries", self.app.max_retries.to_string()),
            row(
                "app",
                "retry backoff",
                format!("{}s", self.app.retry_backoff_seconds),
            ),
        ]
    }
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Section").add_attribute(Attribute::Bold),
                Cell::new("Setting").add_attribute(Attribute::Bold),
                Cell::new("Value").add_attribute(Attribute::Bold),
            ]);

        for row in self.rows() {
            table.add_row(row.to_vec());
        }

        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(provider: &SettingsProvider, json_mode: bool) -> Result<()> {
    let settings = provider
        .get(None, false)
        .context("Failed to load configuration")?;

    output(&ShowOutput::from(settings.as_ref()), json_mode);
    Ok(())
}
