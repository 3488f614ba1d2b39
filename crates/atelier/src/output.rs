// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for CLI subcommands.

use atelier_core::PluginDefinition;
use atelier_module::{ModuleRegistry, ModuleStatus};
use atelier_plugin::{CatalogEntry, PluginStatus};
use colored::Colorize;

use crate::shell::StartupReport;

fn status_symbol(status: &ModuleStatus) -> String {
    match status {
        ModuleStatus::Initialized => "✓".green().to_string(),
        ModuleStatus::Failed { .. } => "✗".red().to_string(),
        ModuleStatus::Blocked { .. } => "!".yellow().to_string(),
        ModuleStatus::Pending => "·".dimmed().to_string(),
    }
}

/// Human summary of a startup run.
pub fn startup_summary(report: &StartupReport) -> Vec<String> {
    let mut lines = Vec::new();
    let bootstrap = &report.bootstrap;
    lines.push(format!(
        "  modules     {} initialized, {} failed, {} blocked ({}ms)",
        bootstrap.initialized().len(),
        bootstrap.failed().len(),
        bootstrap.blocked().len(),
        bootstrap.elapsed.as_millis()
    ));
    for outcome in &bootstrap.outcomes {
        if !outcome.status.is_initialized() {
            lines.push(format!(
                "    {} {:<20} {}",
                status_symbol(&outcome.status),
                outcome.id,
                outcome.status
            ));
        }
    }
    lines.push(format!(
        "  renderers   {} preloaded, {} failed",
        report.preload.resolved.len(),
        report.preload.failed.len()
    ));
    lines.push(format!(
        "  dev tools   {} total ({} explicit, {} discovered, {} unreachable)",
        report.dev_tools.total,
        report.dev_tools.explicit.len(),
        report.dev_tools.discovered.len(),
        report.dev_tools.unreachable.len()
    ));
    if !report.manifests.loaded.is_empty() || !report.manifests.errors.is_empty() {
        lines.push(format!(
            "  manifests   {} loaded, {} rejected",
            report.manifests.loaded.len(),
            report.manifests.errors.len()
        ));
    }
    for (path, error) in &report.manifests.errors {
        lines.push(format!("    {} {}: {error}", "✗".red(), path.display()));
    }
    for key in &report.disabled {
        lines.push(format!("  disabled    {key}"));
    }
    for error in &report.disable_errors {
        lines.push(format!("    {} {error}", "!".yellow()));
    }
    lines
}

/// Resolved order with each module's priority and dependencies.
pub fn order_lines(registry: &ModuleRegistry, order: &[String]) -> Vec<String> {
    order
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let module = registry.get(id)?;
            let descriptor = module.descriptor();
            let priority = descriptor
                .priority
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            let deps = if descriptor.depends_on.is_empty() {
                String::new()
            } else {
                format!(" <- {}", descriptor.depends_on.join(", "))
            };
            Some(format!("  {:>2}. {:<20} priority {priority}{deps}", i + 1, id))
        })
        .collect()
}

pub fn module_lines(registry: &ModuleRegistry) -> Vec<String> {
    registry
        .statuses()
        .iter()
        .map(|(id, status)| format!("  {} {:<20} {status}", status_symbol(status), id))
        .collect()
}

fn plugin_detail(definition: &PluginDefinition) -> String {
    if let Some(tool) = definition.as_dev_tool() {
        tool.route_path
            .clone()
            .or_else(|| tool.panel_component.clone())
            .unwrap_or_else(|| "unreachable".to_string())
    } else if let Some(renderer) = definition.as_renderer() {
        format!("{} (priority {})", renderer.component, renderer.priority)
    } else if let Some(extension) = definition.as_generation_ui() {
        format!("provider {}", extension.provider)
    } else if let Some(node_type) = definition.as_node_type() {
        node_type
            .renderer
            .as_ref()
            .map_or_else(|| "no renderer".to_string(), |r| r.component.clone())
    } else {
        String::new()
    }
}

pub fn plugin_lines(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            let status = match e.status {
                PluginStatus::Enabled => "enabled".green(),
                PluginStatus::Disabled => "disabled".dimmed(),
            };
            format!(
                "  {:<13} {:<22} {:<8} {:<11} {:<9} {}",
                e.definition.family().to_string(),
                e.definition.id,
                e.definition.origin.to_string(),
                e.definition.source.to_string(),
                status,
                plugin_detail(&e.definition)
            )
        })
        .collect()
}
