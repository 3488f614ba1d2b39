// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature modules shipped with the shell.

use std::sync::Arc;

use atelier_module::FeatureModule;

pub mod base;
pub mod generation;
pub mod graph;
pub mod world;

pub use base::CoreModule;
pub use generation::GenerationUiModule;
pub use graph::GraphSystemModule;
pub use world::WorldModule;

/// Every built-in module, in registration order.
pub fn builtin_modules() -> Vec<Arc<dyn FeatureModule>> {
    let modules: [Arc<dyn FeatureModule>; 4] = [
        Arc::new(CoreModule::new()),
        Arc::new(GraphSystemModule::new()),
        Arc::new(WorldModule::new()),
        Arc::new(GenerationUiModule::new()),
    ];
    modules.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{Diagnostics, PluginFamily};
    use atelier_module::{BootstrapOptions, ModuleContext, ModuleRegistry};

    #[tokio::test]
    async fn builtins_bootstrap_cleanly() {
        let ctx = ModuleContext::default();
        let mut registry = ModuleRegistry::new(Diagnostics::new());
        for module in builtin_modules() {
            registry.register_module(module).unwrap();
        }

        let report = registry.bootstrap(&ctx, BootstrapOptions::default()).await.unwrap();

        assert!(report.is_clean());
        assert_eq!(report.order, vec!["core", "graph-system", "world", "generation-ui"]);
        assert_eq!(ctx.catalog.len_of(PluginFamily::NodeType), 8);
        assert_eq!(ctx.renderers.len(), 6);
        assert_eq!(ctx.catalog.len_of(PluginFamily::GenerationUi), 2);
        assert!(!ctx.capabilities.is_enabled("world.simulation"));
    }
}
