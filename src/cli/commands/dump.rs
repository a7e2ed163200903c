//! Implementation of the `sentinelsync dump` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::AppSettings;
use crate::infrastructure::config::SettingsProvider;

const MASK: &str = "********";

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Print passwords in clear text instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

/// Resolved configuration in the same layout as `config/app.yaml`.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DumpOutput {
    pub config: serde_json::Value,
}

impl DumpOutput {
    pub fn new(settings: &AppSettings, show_secrets: bool) -> Result<Self> {
        let mut config =
            serde_json::to_value(settings).context("Failed to serialize configuration")?;

        if !show_secrets {
            for section in ["postgres", "cassandra"] {
                if let Some(password) = config
                    .get_mut(section)
                    .and_then(|s| s.get_mut("password"))
                {
                    *password = serde_json::Value::String(MASK.to_string());
                }
            }
        }

        Ok(Self { config })
    }
}

impl CommandOutput for DumpOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config).unwrap_or_default()
    }

    fn to_json(&self) -> serde_json::Value {
        self.config.clone()
    }
}

pub fn execute(args: &DumpArgs, provider: &SettingsProvider, json_mode: bool) -> Result<()> {
    let settings = provider
        .get(None, false)
        .context("Failed to load configuration")?;

    output(&DumpOutput::new(&settings, args.show_secrets)?, json_mode);
    Ok(())
}
