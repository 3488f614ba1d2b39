// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dev-tool registration: explicit definitions first, then module discovery.

use std::sync::Arc;

use atelier_core::{
    DevToolDefinition, DiagnosticKind, Diagnostics, PluginDefinition, PluginFamily, PluginPayload,
    Source,
};
use atelier_module::{FeatureModule, ModuleRegistry};
use atelier_plugin::PluginCatalog;

/// What a [`DevToolRegistry::register_dev_tools`] pass registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevToolReport {
    /// Explicit definitions newly inserted by this pass.
    pub explicit: Vec<String>,
    /// Tools derived from module pages and inserted by this pass.
    pub discovered: Vec<String>,
    /// Discovered tools with neither a panel component nor a route.
    pub unreachable: Vec<String>,
    /// Dev tools in the catalog after the pass, from any source.
    pub total: usize,
}

/// Feeds explicit and module-declared dev tools into the catalog.
#[derive(Debug, Clone)]
pub struct DevToolRegistry {
    catalog: Arc<PluginCatalog>,
    diagnostics: Diagnostics,
}

impl DevToolRegistry {
    pub fn new(catalog: Arc<PluginCatalog>, diagnostics: Diagnostics) -> Self {
        Self {
            catalog,
            diagnostics,
        }
    }

    /// Register the `explicit` dev-tool definitions, then every tool declared on a module page.
    ///
    /// The explicit pass completes before discovery begins, so an explicit
    /// definition always shadows a discovered one with the same id.
    pub fn register_dev_tools(
        &self,
        modules: &ModuleRegistry,
        explicit: &[PluginDefinition],
    ) -> DevToolReport {
        let mut report = DevToolReport::default();

        for definition in explicit {
            if definition.family() != PluginFamily::DevTool {
                tracing::debug!(
                    id = %definition.id,
                    family = %definition.family(),
                    "ignoring non dev-tool definition in explicit dev-tool list"
                );
                continue;
            }
            if self.catalog.register(definition.clone()).is_inserted() {
                report.explicit.push(definition.id.clone());
            }
        }

        if modules.is_empty() {
            self.diagnostics.warn(
                DiagnosticKind::OrderingHazard,
                "[DevToolRegistry] Dev-tool discovery ran before any module was registered",
            );
        }

        for module in modules.modules_with_dev_tools() {
            let Some(definition) = discovered_definition(module.as_ref()) else {
                continue;
            };
            if self.catalog.contains(PluginFamily::DevTool, &definition.id) {
                tracing::debug!(
                    id = %definition.id,
                    module = %module.id(),
                    "dev tool already registered, skipping discovered definition"
                );
                continue;
            }

            let id = definition.id.clone();
            let reachable = definition.is_reachable();
            let outcome = self.catalog.register(
                PluginDefinition::builtin(id.clone(), PluginPayload::DevTool(definition))
                    .with_source(Source::Discovered),
            );
            if !outcome.is_inserted() {
                continue;
            }

            if !reachable {
                self.diagnostics.warn(
                    DiagnosticKind::MisconfiguredDevTool { id: id.clone() },
                    format!(
                        "[DevToolRegistry] Dev tool {id} from module {} has no panel component or route",
                        module.id()
                    ),
                );
                report.unreachable.push(id.clone());
            }
            report.discovered.push(id);
        }

        report.total = self.catalog.len_of(PluginFamily::DevTool);
        self.diagnostics.info(
            DiagnosticKind::DevToolsRegistered {
                count: report.total,
            },
            format!("[DevToolRegistry] Registered {} dev tools", report.total),
        );
        report
    }
}

/// Build the dev-tool definition a module's page declares, if any.
///
/// Fields missing from the dev-tool block fall back to the page, then the module.
pub fn discovered_definition(module: &dyn FeatureModule) -> Option<DevToolDefinition> {
    let descriptor = module.descriptor();
    let page = descriptor.page.as_ref()?;
    let tool = page.dev_tool.as_ref()?;

    let id = page
        .feature_id
        .clone()
        .unwrap_or_else(|| descriptor.id.clone());
    let label = tool.label.clone().unwrap_or_else(|| descriptor.name.clone());

    let mut definition = DevToolDefinition::new(id, label);
    definition.description = tool.description.clone();
    definition.icon = tool.icon.clone().or_else(|| page.icon.clone());
    if let Some(category) = tool.category.as_ref().or(page.category.as_ref()) {
        definition.category = category.clone();
    }
    definition.panel_component = tool
        .panel_component
        .clone()
        .or_else(|| page.component.clone());
    definition.route_path = tool.route_path.clone().or_else(|| page.route.clone());
    definition.tags = tool.tags.clone();
    definition.safe_for_non_dev = tool.safe_for_non_dev;
    Some(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{MODULE_INSPECTOR, builtin_dev_tool_plugins};
    use atelier_module::{DevToolDescriptor, ModuleDescriptor, PageDescriptor};
    use atelier_test_utils::MockModule;

    fn page(feature_id: Option<&str>, tool: DevToolDescriptor) -> PageDescriptor {
        PageDescriptor {
            feature_id: feature_id.map(str::to_string),
            route: Some("/world".into()),
            icon: Some("globe".into()),
            category: Some("authoring".into()),
            component: Some("WorldPage".into()),
            dev_tool: Some(tool),
            ..PageDescriptor::default()
        }
    }

    #[test]
    fn id_prefers_feature_id() {
        let module = MockModule::new("world").with_page(page(Some("world-tools"), DevToolDescriptor::default()));
        let definition = discovered_definition(&module).unwrap();
        assert_eq!(definition.id, "world-tools");

        let module = MockModule::new("world").with_page(page(None, DevToolDescriptor::default()));
        assert_eq!(discovered_definition(&module).unwrap().id, "world");
    }

    #[test]
    fn missing_fields_fall_back_to_page_and_module() {
        let module = MockModule::new("world")
            .with_name("World Builder")
            .with_page(page(None, DevToolDescriptor::default()));
        let definition = discovered_definition(&module).unwrap();

        assert_eq!(definition.label, "World Builder");
        assert_eq!(definition.route_path.as_deref(), Some("/world"));
        assert_eq!(definition.panel_component.as_deref(), Some("WorldPage"));
        assert_eq!(definition.category, "authoring");
        assert_eq!(definition.icon.as_deref(), Some("globe"));
    }

    #[test]
    fn explicit_tool_fields_win_over_page() {
        let tool = DevToolDescriptor {
            label: Some("World Debugger".into()),
            panel_component: Some("WorldDebugPanel".into()),
            route_path: Some("/dev/world".into()),
            category: Some("debug".into()),
            ..DevToolDescriptor::default()
        };
        let module = MockModule::new("world").with_page(page(None, tool));
        let definition = discovered_definition(&module).unwrap();
        assert_eq!(definition.label, "World Debugger");
        assert_eq!(definition.panel_component.as_deref(), Some("WorldDebugPanel"));
        assert_eq!(definition.route_path.as_deref(), Some("/dev/world"));
        assert_eq!(definition.category, "debug");
    }

    #[test]
    fn category_defaults_to_misc() {
        let module = MockModule::new("bare").with_page(PageDescriptor {
            component: Some("BarePage".into()),
            dev_tool: Some(DevToolDescriptor::default()),
            ..PageDescriptor::default()
        });
        assert_eq!(discovered_definition(&module).unwrap().category, "misc");
    }

    #[test]
    fn explicit_definition_shadows_discovery() {
        let (diagnostics, _memory) = Diagnostics::recording();
        let catalog = Arc::new(PluginCatalog::new(diagnostics.clone()));
        let registry = DevToolRegistry::new(catalog.clone(), diagnostics.clone());

        let mut modules = ModuleRegistry::new(diagnostics);
        modules
            .register_module(Arc::new(
                MockModule::new("inspector")
                    .with_page(page(Some(MODULE_INSPECTOR), DevToolDescriptor::default())),
            ))
            .unwrap();

        let report = registry.register_dev_tools(&modules, &builtin_dev_tool_plugins());
        assert_eq!(report.explicit.len(), 3);
        assert!(report.discovered.is_empty());

        let entry = catalog
            .entry(PluginFamily::DevTool, MODULE_INSPECTOR)
            .unwrap();
        assert_eq!(entry.definition.source, Source::Explicit);
        assert_eq!(
            entry.definition.as_dev_tool().unwrap().label,
            "Module Inspector"
        );
    }

    #[test]
    fn descriptor_without_page_is_ignored() {
        let module = MockModule::from_descriptor(ModuleDescriptor::new("plain", "Plain"));
        assert!(discovered_definition(&module).is_none());
    }
}
