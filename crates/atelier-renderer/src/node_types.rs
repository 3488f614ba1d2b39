// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural node-type definitions and renderer auto-registration.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use atelier_core::{
    AtelierError, DiagnosticKind, Diagnostics, NodeTypeDefinition, PluginDefinition,
    PluginFamily, PluginPayload,
};
use atelier_plugin::{PluginCatalog, RegisterOutcome};

use crate::component::ComponentLibrary;
use crate::registry::{RendererEntry, RendererRegistry};

#[derive(Default)]
struct NodeTypeTable {
    order: Vec<String>,
    by_id: HashMap<String, NodeTypeDefinition>,
}

/// Registry of scene graph node types, first registration wins.
pub struct NodeTypeRegistry {
    table: RwLock<NodeTypeTable>,
    catalog: Arc<PluginCatalog>,
    diagnostics: Diagnostics,
}

impl std::fmt::Debug for NodeTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeTypeRegistry")
            .field("node_types", &self.len())
            .finish()
    }
}

impl NodeTypeRegistry {
    pub fn new(catalog: Arc<PluginCatalog>, diagnostics: Diagnostics) -> Self {
        Self {
            table: RwLock::new(NodeTypeTable::default()),
            catalog,
            diagnostics,
        }
    }

    /// Register a node type and mirror it into the catalog.
    pub fn register(&self, definition: NodeTypeDefinition) -> RegisterOutcome {
        let id = definition.id.clone();
        let inserted = {
            let mut table = self
                .table
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if table.by_id.contains_key(&id) {
                false
            } else {
                table.order.push(id.clone());
                table.by_id.insert(id.clone(), definition.clone());
                true
            }
        };

        if !inserted {
            self.diagnostics.warn(
                DiagnosticKind::DuplicateRegistration {
                    registry: "node-type".to_string(),
                    id: id.clone(),
                },
                format!("[NodeTypeRegistry] Node type {id} already registered, ignoring"),
            );
            return RegisterOutcome::Duplicate;
        }

        self.catalog.register(PluginDefinition::builtin(
            id,
            PluginPayload::NodeType(definition),
        ));
        RegisterOutcome::Inserted
    }

    pub fn get(&self, id: &str) -> Option<NodeTypeDefinition> {
        self.table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .by_id
            .get(id)
            .cloned()
    }

    /// All node types in registration order.
    pub fn list(&self) -> Vec<NodeTypeDefinition> {
        let table = self
            .table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every node type along with its catalog mirror entries.
    pub fn reset(&self) {
        {
            let mut table = self
                .table
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            table.order.clear();
            table.by_id.clear();
        }
        self.catalog.remove_family(PluginFamily::NodeType);
    }
}

/// Options for [`RendererRegistry::auto_register_from_node_types`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoRegisterOptions {
    /// Log each registration at info level instead of debug.
    pub verbose: bool,
    /// Fail on the first node type whose component is not in the library.
    pub strict: bool,
}

/// What auto-registration did with each node type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoRegisterReport {
    pub registered: Vec<String>,
    /// Node types without a renderer reference, or whose renderer was already registered.
    pub skipped: Vec<String>,
    /// Node types whose component is not in the library (non-strict mode only).
    pub missing: Vec<String>,
}

impl RendererRegistry {
    /// Register a renderer for every node type that declares a renderer component.
    ///
    /// Registrations made before a strict-mode failure are kept.
    pub fn auto_register_from_node_types(
        &self,
        node_types: &NodeTypeRegistry,
        library: &ComponentLibrary,
        options: AutoRegisterOptions,
    ) -> Result<AutoRegisterReport, AtelierError> {
        let mut report = AutoRegisterReport::default();

        for definition in node_types.list() {
            let Some(reference) = &definition.renderer else {
                report.skipped.push(definition.id.clone());
                continue;
            };

            let Some(loader) = library.get(&reference.component) else {
                if options.strict {
                    return Err(AtelierError::MissingRendererComponent {
                        node_type: definition.id.clone(),
                        component: reference.component.clone(),
                    });
                }
                self.diagnostics.warn(
                    DiagnosticKind::RendererComponentMissing {
                        node_type: definition.id.clone(),
                        component: reference.component.clone(),
                    },
                    format!(
                        "[RendererRegistry] Node type {} references missing component {}, skipping",
                        definition.id, reference.component
                    ),
                );
                report.missing.push(definition.id.clone());
                continue;
            };

            let entry = RendererEntry::new(
                definition.id.clone(),
                reference.component.clone(),
                reference.priority,
                loader,
            );
            if self.register(entry).is_inserted() {
                if options.verbose {
                    tracing::info!(
                        node_type = %definition.id,
                        component = %reference.component,
                        priority = reference.priority,
                        "auto-registered renderer"
                    );
                } else {
                    tracing::debug!(node_type = %definition.id, "auto-registered renderer");
                }
                report.registered.push(definition.id.clone());
            } else {
                report.skipped.push(definition.id.clone());
            }
        }

        Ok(report)
    }
}
