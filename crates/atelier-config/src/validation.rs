// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::str::FromStr;

use atelier_core::PluginFamily;

use crate::diagnostic::ConfigError;
use crate::model::AtelierConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Highest accepted renderer priority threshold.
pub const MAX_PRELOAD_THRESHOLD: u32 = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &AtelierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.shell.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "shell.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.shell.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "shell.log_level `{}` is not one of: {}",
                config.shell.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.renderers.preload_threshold > MAX_PRELOAD_THRESHOLD {
        errors.push(ConfigError::Validation {
            message: format!(
                "renderers.preload_threshold must be at most {MAX_PRELOAD_THRESHOLD}, got {}",
                config.renderers.preload_threshold
            ),
        });
    }

    for (i, dir) in config.plugins.manifest_dirs.iter().enumerate() {
        if dir.as_os_str().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins.manifest_dirs[{i}] must not be empty"),
            });
        }
    }

    for key in &config.plugins.disabled {
        if let Err(message) = parse_plugin_key(key) {
            errors.push(ConfigError::Validation { message });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Split a `family/id` key into its parts.
pub fn parse_plugin_key(key: &str) -> Result<(PluginFamily, String), String> {
    let Some((family, id)) = key.split_once('/') else {
        return Err(format!(
            "plugins.disabled entry `{key}` must have the form `family/id`"
        ));
    };
    let family = PluginFamily::from_str(family)
        .map_err(|_| format!("plugins.disabled entry `{key}` has unknown family `{family}`"))?;
    if id.trim().is_empty() {
        return Err(format!("plugins.disabled entry `{key}` has an empty id"));
    }
    Ok((family, id.to_string()))
}
