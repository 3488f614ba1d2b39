// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dev-tool discovery against a bootstrapped module set.

use atelier_core::{
    DevToolDefinition, DiagnosticKind, Origin, PluginDefinition, PluginFamily, PluginPayload,
    Severity, Source,
};
use atelier_devtools::{PLUGIN_CATALOG, builtin_dev_tool_plugins};
use atelier_module::{DevToolDescriptor, PageDescriptor};
use atelier_test_utils::{MockModule, TestShell};

fn tool_page(feature_id: &str, panel: Option<&str>, route: Option<&str>) -> PageDescriptor {
    PageDescriptor {
        feature_id: Some(feature_id.to_string()),
        route: route.map(str::to_string),
        component: panel.map(str::to_string),
        dev_tool: Some(DevToolDescriptor::default()),
        ..PageDescriptor::default()
    }
}

#[tokio::test]
async fn zero_modules_registers_only_explicit_and_warns() {
    let shell = TestShell::new();

    let report = shell.register_dev_tools(&builtin_dev_tool_plugins());

    assert_eq!(report.explicit.len(), 3);
    assert!(report.discovered.is_empty());
    assert_eq!(report.total, 3);
    assert_eq!(shell.count(|k| matches!(k, DiagnosticKind::OrderingHazard)), 1);
}

#[tokio::test]
async fn discovers_tools_from_module_pages() {
    let mut shell = TestShell::new();
    let world = MockModule::new("world")
        .with_page(tool_page("world-tools", Some("WorldPage"), Some("/world")))
        .shared();
    let graph = MockModule::new("graph")
        .with_page(tool_page("graph-tools", None, Some("/graph")))
        .shared();
    let plain = MockModule::new("plain").shared();
    shell.register(&world).unwrap();
    shell.register(&graph).unwrap();
    shell.register(&plain).unwrap();
    shell.bootstrap().await.unwrap();

    let report = shell.register_dev_tools(&builtin_dev_tool_plugins());

    assert_eq!(report.discovered, vec!["world-tools", "graph-tools"]);
    assert!(report.unreachable.is_empty());
    assert_eq!(report.total, 5);

    let entry = shell
        .ctx
        .catalog
        .entry(PluginFamily::DevTool, "graph-tools")
        .unwrap();
    assert_eq!(entry.definition.source, Source::Discovered);

    let summary = shell
        .events()
        .into_iter()
        .find(|e| matches!(e.kind, DiagnosticKind::DevToolsRegistered { .. }))
        .unwrap();
    assert_eq!(summary.message, "[DevToolRegistry] Registered 5 dev tools");
    assert_eq!(summary.severity, Severity::Info);
}

#[tokio::test]
async fn unreachable_tool_is_registered_and_flagged() {
    let mut shell = TestShell::new();
    let orphan = MockModule::new("orphan")
        .with_page(tool_page("orphan-tools", None, None))
        .shared();
    shell.register(&orphan).unwrap();
    shell.bootstrap().await.unwrap();

    let report = shell.register_dev_tools(&[]);

    assert_eq!(report.unreachable, vec!["orphan-tools"]);
    assert!(
        shell
            .ctx
            .catalog
            .contains(PluginFamily::DevTool, "orphan-tools")
    );
    assert_eq!(
        shell.count(|k| matches!(k, DiagnosticKind::MisconfiguredDevTool { id } if id == "orphan-tools")),
        1
    );
}

#[tokio::test]
async fn user_manifest_tool_keeps_its_origin_and_loses_to_builtin() {
    let mut shell = TestShell::new();
    let module = MockModule::new("m").shared();
    shell.register(&module).unwrap();

    let mut user_catalog = DevToolDefinition::new(PLUGIN_CATALOG, "My Catalog");
    user_catalog.route_path = Some("/mine".into());
    let user_profiler = DevToolDefinition {
        route_path: Some("/dev/profiler".into()),
        ..DevToolDefinition::new("profiler", "Profiler")
    };

    let mut explicit = builtin_dev_tool_plugins();
    for tool in [user_catalog, user_profiler] {
        explicit.push(
            PluginDefinition::builtin(tool.id.clone(), PluginPayload::DevTool(tool))
                .with_origin(Origin::User),
        );
    }

    let report = shell.register_dev_tools(&explicit);

    assert_eq!(report.explicit.len(), 4);
    let catalog = shell.ctx.catalog.get(PluginFamily::DevTool, PLUGIN_CATALOG).unwrap();
    assert_eq!(catalog.origin, Origin::Builtin);
    let profiler = shell.ctx.catalog.get(PluginFamily::DevTool, "profiler").unwrap();
    assert_eq!(profiler.origin, Origin::User);
    assert_eq!(
        shell.count(|k| matches!(k, DiagnosticKind::DuplicateRegistration { .. })),
        1
    );
}

#[tokio::test]
async fn second_pass_is_idempotent() {
    let mut shell = TestShell::new();
    let world = MockModule::new("world")
        .with_page(tool_page("world-tools", Some("WorldPage"), None))
        .shared();
    shell.register(&world).unwrap();

    let first = shell.register_dev_tools(&builtin_dev_tool_plugins());
    let second = shell.register_dev_tools(&builtin_dev_tool_plugins());

    assert_eq!(first.total, second.total);
    assert!(second.explicit.is_empty());
    assert!(second.discovered.is_empty());
}
