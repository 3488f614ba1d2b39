// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scene graph: node types, their renderer components, and the graph editor page.

use async_trait::async_trait;
use atelier_core::{AtelierError, NodeTypeDefinition, RendererRef};
use atelier_module::{
    ActionDescriptor, DevToolDescriptor, FeatureModule, ModuleContext, ModuleDescriptor,
    PageDescriptor,
};
use atelier_plugin::Capability;
use atelier_renderer::{ComponentLoader, NamedComponent};

pub const ID: &str = "graph-system";

/// `(node type, label, category, renderer component, renderer priority)`.
const NODE_TYPES: &[(&str, &str, &str, Option<&str>, u32)] = &[
    ("scene", "Scene", "structure", None, 0),
    ("video", "Video", "media", Some("VideoNodeRenderer"), 10),
    ("choice", "Choice", "flow", Some("ChoiceNodeRenderer"), 9),
    ("scene_call", "Scene Call", "flow", Some("SceneCallNodeRenderer"), 8),
    ("dialogue", "Dialogue", "narrative", Some("DialogueNodeRenderer"), 6),
    ("condition", "Condition", "flow", Some("ConditionNodeRenderer"), 5),
    ("tooltip", "Tooltip", "annotation", Some("TooltipNodeRenderer"), 3),
    ("comment", "Comment", "annotation", None, 0),
];

pub struct GraphSystemModule {
    descriptor: ModuleDescriptor,
}

impl GraphSystemModule {
    pub fn new() -> Self {
        let page = PageDescriptor {
            feature_id: Some("graph".to_string()),
            route: Some("/graph".to_string()),
            icon: Some("share-2".to_string()),
            category: Some("authoring".to_string()),
            component: Some("GraphEditorPage".to_string()),
            actions: vec![
                ActionDescriptor::new("graph.new-scene", "New Scene"),
                ActionDescriptor::new("graph.auto-layout", "Auto Layout"),
            ],
            dev_tool: Some(DevToolDescriptor {
                label: Some("Graph Inspector".to_string()),
                panel_component: Some("GraphInspectorPanel".to_string()),
                tags: vec!["graph".to_string(), "nodes".to_string()],
                ..DevToolDescriptor::default()
            }),
        };
        Self {
            descriptor: ModuleDescriptor::new(ID, "Graph System")
                .with_priority(50)
                .depends_on([super::base::ID])
                .with_page(page),
        }
    }
}

impl Default for GraphSystemModule {
    fn default() -> Self {
        Self::new()
    }
}

pub fn node_type_definitions() -> Vec<NodeTypeDefinition> {
    NODE_TYPES
        .iter()
        .map(|&(id, label, category, component, priority)| NodeTypeDefinition {
            id: id.to_string(),
            label: label.to_string(),
            category: Some(category.to_string()),
            renderer: component.map(|component| RendererRef {
                component: component.to_string(),
                priority,
            }),
        })
        .collect()
}

#[async_trait]
impl FeatureModule for GraphSystemModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), AtelierError> {
        for definition in node_type_definitions() {
            if let Some(reference) = &definition.renderer {
                let component = reference.component.clone();
                ctx.components.insert(
                    component.clone(),
                    ComponentLoader::ready(NamedComponent::handle(component)),
                );
            }
            ctx.node_types.register(definition);
        }

        let report = ctx.renderers.auto_register_from_node_types(
            &ctx.node_types,
            &ctx.components,
            ctx.renderer_options,
        )?;
        tracing::debug!(
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            missing = report.missing.len(),
            "graph renderers registered"
        );

        ctx.capabilities.register(Capability::new("graph.edit", "graph"));
        ctx.capabilities.register(Capability::new("graph.layout", "graph"));
        Ok(())
    }
}
