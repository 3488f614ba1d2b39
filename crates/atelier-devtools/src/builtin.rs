// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dev tools shipped with the shell itself.

use atelier_core::{DevToolDefinition, PluginDefinition, PluginPayload};

pub const MODULE_INSPECTOR: &str = "module-inspector";
pub const PLUGIN_CATALOG: &str = "plugin-catalog";
pub const RENDERER_STATUS: &str = "renderer-status";

fn runtime_tool(
    id: &str,
    label: &str,
    description: &str,
    panel: &str,
    route: &str,
    tags: &[&str],
) -> DevToolDefinition {
    DevToolDefinition {
        description: Some(description.to_string()),
        category: "runtime".to_string(),
        panel_component: Some(panel.to_string()),
        route_path: Some(route.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..DevToolDefinition::new(id, label)
    }
}

/// The explicit dev-tool definitions registered before discovery runs.
pub fn builtin_dev_tools() -> Vec<DevToolDefinition> {
    vec![
        runtime_tool(
            MODULE_INSPECTOR,
            "Module Inspector",
            "Initialization order and status of every feature module",
            "ModuleInspectorPanel",
            "/dev/modules",
            &["modules", "bootstrap"],
        ),
        DevToolDefinition {
            safe_for_non_dev: true,
            icon: Some("puzzle".to_string()),
            ..runtime_tool(
                PLUGIN_CATALOG,
                "Plugin Catalog",
                "Registered plugins by family, with enable toggles",
                "PluginCatalogPanel",
                "/dev/plugins",
                &["plugins"],
            )
        },
        runtime_tool(
            RENDERER_STATUS,
            "Renderer Status",
            "Load state of every node renderer",
            "RendererStatusPanel",
            "/dev/renderers",
            &["renderers", "preload"],
        ),
    ]
}

/// The built-ins as catalog definitions; the module inspector cannot be disabled.
pub fn builtin_dev_tool_plugins() -> Vec<PluginDefinition> {
    builtin_dev_tools()
        .into_iter()
        .map(|tool| {
            let can_disable = tool.id != MODULE_INSPECTOR;
            PluginDefinition::builtin(tool.id.clone(), PluginPayload::DevTool(tool))
                .with_can_disable(can_disable)
        })
        .collect()
}
