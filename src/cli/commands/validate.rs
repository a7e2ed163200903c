//! Implementation of the `sentinelsync validate` command.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::{ConfigError, SettingsProvider};

#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        if self.valid {
            return "Configuration is valid".to_string();
        }

        let mut lines = vec![format!(
            "Configuration has {} problem(s):",
            self.errors.len()
        )];
        lines.extend(self.errors.iter().map(|e| format!("  - {e}")));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(provider: &SettingsProvider, json_mode: bool) -> Result<()> {
    match provider.get(None, false) {
        Ok(_) => {
            output(
                &ValidateOutput {
                    valid: true,
                    errors: vec![],
                },
                json_mode,
            );
            Ok(())
        }
        Err(ConfigError::Validation(errors)) => {
            output(
                &ValidateOutput {
                    valid: false,
                    errors: errors.iter().map(ToString::to_string).collect(),
                },
                json_mode,
            );
            bail!("configuration is invalid")
        }
        Err(err) => Err(err).context("Failed to load configuration"),
    }
}
