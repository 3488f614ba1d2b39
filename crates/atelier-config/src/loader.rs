// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./atelier.toml` > `~/.config/atelier/atelier.toml` > `/etc/atelier/atelier.toml`
//! with environment variable overrides via `ATELIER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AtelierConfig;

const SYSTEM_CONFIG: &str = "/etc/atelier/atelier.toml";
const LOCAL_CONFIG: &str = "atelier.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/atelier/atelier.toml` (system-wide)
/// 3. `~/.config/atelier/atelier.toml` (user XDG config)
/// 4. `./atelier.toml` (local directory)
/// 5. `ATELIER_*` environment variables
pub fn load_config() -> Result<AtelierConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<AtelierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AtelierConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AtelierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AtelierConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AtelierConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("atelier/atelier.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Paths consulted by [`load_config`], lowest precedence first.
pub fn config_paths() -> Vec<std::path::PathBuf> {
    let mut paths = vec![std::path::PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("atelier/atelier.toml"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(LOCAL_CONFIG));
    }
    paths
}

/// Env provider mapping the first underscore after a section name to a dot.
///
/// `ATELIER_RENDERERS_PRELOAD_THRESHOLD` maps to `renderers.preload_threshold`,
/// not `renderers.preload.threshold`.
fn env_provider() -> Env {
    Env::prefixed("ATELIER_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("shell_", "shell.", 1)
            .replacen("bootstrap_", "bootstrap.", 1)
            .replacen("renderers_", "renderers.", 1)
            .replacen("plugins_", "plugins.", 1);
        mapped.into()
    })
}
