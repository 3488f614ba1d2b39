// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry harness for integration tests.
//!
//! `TestShell` wires a [`ModuleContext`], a [`ModuleRegistry`], and a
//! [`DevToolRegistry`] to one recording diagnostics channel so tests can
//! drive bootstrap and discovery and then assert on the emitted events.

use std::sync::Arc;

use atelier_core::{
    AtelierError, DiagnosticEvent, DiagnosticKind, Diagnostics, MemorySink, PluginDefinition,
};
use atelier_devtools::{DevToolRegistry, DevToolReport};
use atelier_module::{
    BootstrapOptions, BootstrapReport, FeatureModule, ModuleContext, ModuleRegistry,
};

/// Registries plus a recording sink, without config or manifests.
pub struct TestShell {
    pub ctx: ModuleContext,
    pub modules: ModuleRegistry,
    pub dev_tools: DevToolRegistry,
    pub memory: Arc<MemorySink>,
    options: BootstrapOptions,
}

impl TestShell {
    /// Empty registries, sequential bootstrap, no module timeout.
    pub fn new() -> Self {
        let (diagnostics, memory) = Diagnostics::recording();
        let ctx = ModuleContext::new(diagnostics.clone());
        Self {
            dev_tools: DevToolRegistry::new(ctx.catalog.clone(), diagnostics.clone()),
            modules: ModuleRegistry::new(diagnostics),
            ctx,
            memory,
            options: BootstrapOptions {
                timeout: None,
                ..BootstrapOptions::default()
            },
        }
    }

    pub fn with_options(mut self, options: BootstrapOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a module, keeping the caller's handle usable for assertions.
    pub fn register<M: FeatureModule>(&mut self, module: &Arc<M>) -> Result<(), AtelierError> {
        self.modules
            .register_module(module.clone() as Arc<dyn FeatureModule>)
    }

    pub async fn bootstrap(&mut self) -> Result<BootstrapReport, AtelierError> {
        self.modules.bootstrap(&self.ctx, self.options).await
    }

    pub fn register_dev_tools(&self, explicit: &[PluginDefinition]) -> DevToolReport {
        self.dev_tools.register_dev_tools(&self.modules, explicit)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.ctx.diagnostics.clone()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.memory.events()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DiagnosticKind) -> bool) -> usize {
        self.memory.count(predicate)
    }
}

impl Default for TestShell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockModule;

    #[tokio::test]
    async fn bootstrap_records_module_events() {
        let mut shell = TestShell::new();
        let ok = MockModule::new("ok").shared();
        let bad = MockModule::new("bad").failing("nope").shared();
        shell.register(&ok).unwrap();
        shell.register(&bad).unwrap();

        let report = shell.bootstrap().await.unwrap();

        assert_eq!(report.failed(), vec!["bad"]);
        assert_eq!(
            shell.count(|k| matches!(k, DiagnosticKind::ModuleInitialized { .. })),
            1
        );
        assert_eq!(ok.calls(), 1);
    }
}
