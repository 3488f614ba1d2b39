// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registries handed to each module's `initialize()`.

use std::sync::Arc;

use atelier_core::Diagnostics;
use atelier_plugin::{CapabilityRegistry, PluginCatalog};
use atelier_renderer::{AutoRegisterOptions, ComponentLibrary, NodeTypeRegistry, RendererRegistry};

/// Shared registries a module may write to while initializing.
///
/// Every field is an `Arc`, so the context is cheap to clone and the same
/// instances are visible to every module and to the shell afterwards.
#[derive(Clone, Debug)]
pub struct ModuleContext {
    pub catalog: Arc<PluginCatalog>,
    pub capabilities: Arc<CapabilityRegistry>,
    pub renderers: Arc<RendererRegistry>,
    pub node_types: Arc<NodeTypeRegistry>,
    pub components: Arc<ComponentLibrary>,
    pub diagnostics: Diagnostics,
    /// Options modules pass to renderer auto-registration.
    pub renderer_options: AutoRegisterOptions,
}

impl ModuleContext {
    /// Fresh, empty registries sharing one diagnostics channel.
    pub fn new(diagnostics: Diagnostics) -> Self {
        let catalog = Arc::new(PluginCatalog::new(diagnostics.clone()));
        Self {
            capabilities: Arc::new(CapabilityRegistry::new(diagnostics.clone())),
            renderers: Arc::new(RendererRegistry::new(catalog.clone(), diagnostics.clone())),
            node_types: Arc::new(NodeTypeRegistry::new(catalog.clone(), diagnostics.clone())),
            components: Arc::new(ComponentLibrary::new()),
            catalog,
            diagnostics,
            renderer_options: AutoRegisterOptions::default(),
        }
    }

    pub fn with_renderer_options(mut self, options: AutoRegisterOptions) -> Self {
        self.renderer_options = options;
        self
    }

    /// Empty every registry.
    pub fn reset(&self) {
        self.catalog.reset();
        self.capabilities.reset();
        self.renderers.reset();
        self.node_types.reset();
        self.components.clear();
    }
}

impl Default for ModuleContext {
    fn default() -> Self {
        Self::new(Diagnostics::new())
    }
}
