// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Atelier shell.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Atelier configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AtelierConfig {
    /// Shell identity and logging.
    #[serde(default)]
    pub shell: ShellConfig,

    /// Module bootstrap behavior.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    /// Renderer registration and preload.
    #[serde(default)]
    pub renderers: RendererConfig,

    /// User plugin manifests and disabled plugins.
    #[serde(default)]
    pub plugins: PluginsConfig,
}

/// Shell identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Display name of the shell.
    #[serde(default = "default_shell_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Show dev tools that are not marked safe for non-dev use.
    #[serde(default)]
    pub dev_mode: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: default_shell_name(),
            log_level: default_log_level(),
            dev_mode: false,
        }
    }
}

fn default_shell_name() -> String {
    "atelier".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How independent modules are scheduled during bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapConcurrency {
    /// One module at a time, in resolved order.
    #[default]
    Sequential,
    /// Modules at the same dependency depth initialize concurrently.
    Waves,
}

/// Module bootstrap configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Soft timeout for each module's `initialize()`, in milliseconds. 0 disables it.
    #[serde(default = "default_module_timeout_ms")]
    pub module_timeout_ms: u64,

    #[serde(default)]
    pub concurrency: BootstrapConcurrency,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            module_timeout_ms: default_module_timeout_ms(),
            concurrency: BootstrapConcurrency::default(),
        }
    }
}

impl BootstrapConfig {
    /// The per-module timeout, or `None` when disabled.
    pub fn module_timeout(&self) -> Option<Duration> {
        (self.module_timeout_ms > 0).then(|| Duration::from_millis(self.module_timeout_ms))
    }
}

fn default_module_timeout_ms() -> u64 {
    10_000
}

/// Renderer registration and preload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    /// Renderers with priority strictly above this value are preloaded.
    #[serde(default = "default_preload_threshold")]
    pub preload_threshold: u32,

    /// Treat a node type referencing a missing component as fatal.
    #[serde(default)]
    pub strict: bool,

    /// Log every auto-registered renderer at info level.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preload_threshold: default_preload_threshold(),
            strict: false,
            verbose: false,
        }
    }
}

fn default_preload_threshold() -> u32 {
    7
}

/// Plugin manifest configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Directories scanned for `*.toml` plugin manifests.
    #[serde(default)]
    pub manifest_dirs: Vec<PathBuf>,

    /// Plugins to disable after startup, as `family/id` keys.
    #[serde(default)]
    pub disabled: Vec<String>,
}
