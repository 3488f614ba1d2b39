// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The shell runtime context and its startup sequence.
//!
//! A [`Shell`] is built once from configuration and owns every registry.
//! [`Shell::start`] runs the startup sequence in a fixed order:
//!
//! 1. plugin manifests are parsed; generation-UI extensions are registered
//! 2. modules are bootstrapped in dependency order
//! 3. high-priority renderers are preloaded
//! 4. dev tools are registered: built-ins, then manifest tools, then discovery
//! 5. plugins listed in `plugins.disabled` are disabled

use std::path::PathBuf;
use std::sync::Arc;

use atelier_config::AtelierConfig;
use atelier_config::validation::parse_plugin_key;
use atelier_core::{AtelierError, DevToolDefinition, Diagnostics, PluginDefinition, PluginFamily};
use atelier_devtools::{DevToolRegistry, DevToolReport, builtin_dev_tool_plugins};
use atelier_module::{
    BootstrapOptions, BootstrapReport, FeatureModule, ModuleContext, ModuleRegistry,
};
use atelier_plugin::{PluginCatalog, load_manifest_dir};
use atelier_renderer::{AutoRegisterOptions, PreloadReport};

/// What the manifest step found.
#[derive(Debug, Clone, Default)]
pub struct ManifestSummary {
    /// `family/id` of every manifest parsed successfully.
    pub loaded: Vec<String>,
    /// Manifests that could not be read or parsed.
    pub errors: Vec<(PathBuf, String)>,
}

/// Everything [`Shell::start`] did.
#[derive(Debug, Clone, Default)]
pub struct StartupReport {
    pub manifests: ManifestSummary,
    pub bootstrap: BootstrapReport,
    pub preload: PreloadReport,
    pub dev_tools: DevToolReport,
    /// `family/id` keys disabled from configuration.
    pub disabled: Vec<String>,
    /// Configured disables that could not be applied.
    pub disable_errors: Vec<String>,
}

/// Explicit runtime context owning every registry.
pub struct Shell {
    config: AtelierConfig,
    ctx: ModuleContext,
    modules: ModuleRegistry,
    dev_tools: DevToolRegistry,
}

impl Shell {
    /// An empty shell logging diagnostics through `tracing`.
    pub fn new(config: AtelierConfig) -> Self {
        Self::with_diagnostics(config, Diagnostics::new())
    }

    pub fn with_diagnostics(config: AtelierConfig, diagnostics: Diagnostics) -> Self {
        let ctx = ModuleContext::new(diagnostics.clone()).with_renderer_options(
            AutoRegisterOptions {
                verbose: config.renderers.verbose,
                strict: config.renderers.strict,
            },
        );
        Self {
            dev_tools: DevToolRegistry::new(ctx.catalog.clone(), diagnostics.clone()),
            modules: ModuleRegistry::new(diagnostics),
            ctx,
            config,
        }
    }

    /// A shell with the built-in feature modules registered.
    pub fn with_builtin_modules(config: AtelierConfig) -> Result<Self, AtelierError> {
        let mut shell = Self::new(config);
        shell.register_builtin_modules()?;
        Ok(shell)
    }

    pub fn register_builtin_modules(&mut self) -> Result<(), AtelierError> {
        for module in crate::features::builtin_modules() {
            self.modules.register_module(module)?;
        }
        Ok(())
    }

    pub fn register_module(&mut self, module: Arc<dyn FeatureModule>) -> Result<(), AtelierError> {
        self.modules.register_module(module)
    }

    pub fn config(&self) -> &AtelierConfig {
        &self.config
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    pub fn catalog(&self) -> &Arc<PluginCatalog> {
        &self.ctx.catalog
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Run the full startup sequence.
    ///
    /// Fails only on structural module defects or a repeated start; every
    /// other problem is isolated and recorded in the report.
    pub async fn start(&mut self) -> Result<StartupReport, AtelierError> {
        tracing::info!(shell = %self.config.shell.name, "[Shell] Starting");

        let (manifests, manifest_tools) = self.load_manifests();

        let bootstrap = self
            .modules
            .bootstrap(&self.ctx, BootstrapOptions::from(&self.config.bootstrap))
            .await
            .inspect_err(|e| {
                if e.is_structural() {
                    tracing::error!(error = %e, "[Shell] Module set is invalid, aborting startup");
                }
            })?;

        let preload = self
            .ctx
            .renderers
            .preload_high_priority(self.config.renderers.preload_threshold)
            .await;

        let mut explicit = builtin_dev_tool_plugins();
        explicit.extend(manifest_tools);
        let dev_tools = self.dev_tools.register_dev_tools(&self.modules, &explicit);

        let (disabled, disable_errors) = self.apply_disabled();

        let report = StartupReport {
            manifests,
            bootstrap,
            preload,
            dev_tools,
            disabled,
            disable_errors,
        };
        tracing::info!(
            modules = report.bootstrap.initialized().len(),
            failed = report.bootstrap.failed().len(),
            blocked = report.bootstrap.blocked().len(),
            preloaded = report.preload.resolved.len(),
            dev_tools = report.dev_tools.total,
            plugins = self.ctx.catalog.len(),
            "[Shell] Startup complete"
        );
        Ok(report)
    }

    /// Parse every configured manifest directory.
    ///
    /// Generation-UI extensions go straight into the catalog. Dev tools are
    /// returned so they register after the built-ins.
    fn load_manifests(&self) -> (ManifestSummary, Vec<PluginDefinition>) {
        let mut summary = ManifestSummary::default();
        let mut dev_tools = Vec::new();

        for dir in &self.config.plugins.manifest_dirs {
            let scan = load_manifest_dir(dir);
            for (path, error) in scan.errors {
                tracing::warn!(path = %path.display(), error = %error, "skipping plugin manifest");
                summary.errors.push((path, error.to_string()));
            }
            for definition in scan.definitions {
                summary
                    .loaded
                    .push(format!("{}/{}", definition.family(), definition.id));
                if definition.family() == PluginFamily::DevTool {
                    dev_tools.push(definition);
                } else {
                    self.ctx.catalog.register(definition);
                }
            }
        }

        if !summary.loaded.is_empty() {
            tracing::info!(count = summary.loaded.len(), "loaded plugin manifests");
        }
        (summary, dev_tools)
    }

    fn apply_disabled(&self) -> (Vec<String>, Vec<String>) {
        let mut disabled = Vec::new();
        let mut errors = Vec::new();
        for key in &self.config.plugins.disabled {
            let result = parse_plugin_key(key).and_then(|(family, id)| {
                self.ctx
                    .catalog
                    .set_enabled(family, &id, false)
                    .map_err(|e| e.to_string())
            });
            match result {
                Ok(()) => {
                    tracing::debug!(plugin = %key, "disabled from configuration");
                    disabled.push(key.clone());
                }
                Err(error) => {
                    tracing::warn!(plugin = %key, error = %error, "could not disable plugin");
                    errors.push(error);
                }
            }
        }
        (disabled, errors)
    }

    /// Enabled dev tools the current mode may show.
    ///
    /// Outside dev mode only tools marked `safe_for_non_dev` are visible.
    pub fn visible_dev_tools(&self) -> Vec<DevToolDefinition> {
        let dev_mode = self.config.shell.dev_mode;
        self.ctx
            .catalog
            .enabled(PluginFamily::DevTool)
            .iter()
            .filter_map(PluginDefinition::as_dev_tool)
            .filter(|tool| dev_mode || tool.safe_for_non_dev)
            .cloned()
            .collect()
    }

    /// Empty every registry and forget every module.
    pub fn reset(&mut self) {
        self.ctx.reset();
        self.modules.reset();
    }
}
