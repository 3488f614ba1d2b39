// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin catalog shared by every registry in the shell.
//!
//! The `PluginCatalog` stores `PluginDefinition`s keyed by `(family, id)` in
//! insertion order. It is the single point of truth for "is X already
//! registered": a second registration of the same key is ignored, never an
//! overwrite. The check and the insert happen under one write lock, so
//! concurrent registrations from modules initializing in parallel cannot
//! both win.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use atelier_core::{
    AtelierError, DevToolDefinition, DiagnosticKind, Diagnostics, GenerationUiExtension,
    NodeTypeDefinition, PluginDefinition, PluginFamily, RendererInfo,
};

/// Status of a plugin in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    /// Plugin is active.
    Enabled,
    /// Plugin was disabled after registration.
    Disabled,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Enabled => write!(f, "enabled"),
            PluginStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Inserted,
    /// The key was already present; the catalog is unchanged.
    Duplicate,
}

impl RegisterOutcome {
    pub fn is_inserted(self) -> bool {
        self == RegisterOutcome::Inserted
    }
}

/// A single entry in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub definition: PluginDefinition,
    pub status: PluginStatus,
}

#[derive(Debug, Default)]
struct CatalogState {
    entries: Vec<CatalogEntry>,
    index: HashMap<(PluginFamily, String), usize>,
}

/// Multi-family registration store with first-wins idempotency.
#[derive(Debug)]
pub struct PluginCatalog {
    state: RwLock<CatalogState>,
    diagnostics: Diagnostics,
}

impl PluginCatalog {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            diagnostics,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a definition unless its `(family, id)` is already present.
    pub fn register(&self, definition: PluginDefinition) -> RegisterOutcome {
        let family = definition.family();
        let id = definition.id.clone();

        let outcome = {
            let mut state = self.write();
            let key = (family, id.clone());
            if state.index.contains_key(&key) {
                RegisterOutcome::Duplicate
            } else {
                let position = state.entries.len();
                state.entries.push(CatalogEntry {
                    definition,
                    status: PluginStatus::Enabled,
                });
                state.index.insert(key, position);
                RegisterOutcome::Inserted
            }
        };

        match outcome {
            RegisterOutcome::Inserted => {
                tracing::debug!(%family, id = %id, "plugin registered");
            }
            RegisterOutcome::Duplicate => self.diagnostics.warn(
                DiagnosticKind::DuplicateRegistration {
                    registry: family.to_string(),
                    id: id.clone(),
                },
                format!("[PluginCatalog] {family}/{id} is already registered, ignoring"),
            ),
        }
        outcome
    }

    pub fn contains(&self, family: PluginFamily, id: &str) -> bool {
        self.read().index.contains_key(&(family, id.to_string()))
    }

    pub fn get(&self, family: PluginFamily, id: &str) -> Option<PluginDefinition> {
        self.entry(family, id).map(|entry| entry.definition)
    }

    pub fn entry(&self, family: PluginFamily, id: &str) -> Option<CatalogEntry> {
        let state = self.read();
        state
            .index
            .get(&(family, id.to_string()))
            .map(|&i| state.entries[i].clone())
    }

    /// All definitions in insertion order, optionally restricted to one family.
    pub fn get_all(&self, family: Option<PluginFamily>) -> Vec<PluginDefinition> {
        self.read()
            .entries
            .iter()
            .filter(|e| family.is_none_or(|f| e.definition.family() == f))
            .map(|e| e.definition.clone())
            .collect()
    }

    /// Entries with their status, optionally restricted to one family.
    pub fn entries(&self, family: Option<PluginFamily>) -> Vec<CatalogEntry> {
        self.read()
            .entries
            .iter()
            .filter(|e| family.is_none_or(|f| e.definition.family() == f))
            .cloned()
            .collect()
    }

    /// Enabled definitions of one family, in insertion order.
    pub fn enabled(&self, family: PluginFamily) -> Vec<PluginDefinition> {
        self.read()
            .entries
            .iter()
            .filter(|e| e.definition.family() == family && e.status == PluginStatus::Enabled)
            .map(|e| e.definition.clone())
            .collect()
    }

    /// Toggle a plugin's status.
    ///
    /// Disabling fails for definitions registered with `can_disable = false`.
    pub fn set_enabled(
        &self,
        family: PluginFamily,
        id: &str,
        enabled: bool,
    ) -> Result<(), AtelierError> {
        let mut state = self.write();
        let position = *state.index.get(&(family, id.to_string())).ok_or_else(|| {
            AtelierError::PluginNotFound {
                family: family.to_string(),
                id: id.to_string(),
            }
        })?;
        let entry = &mut state.entries[position];
        if !enabled && !entry.definition.can_disable {
            return Err(AtelierError::CannotDisable {
                family: family.to_string(),
                id: id.to_string(),
            });
        }
        entry.status = if enabled {
            PluginStatus::Enabled
        } else {
            PluginStatus::Disabled
        };
        Ok(())
    }

    pub fn is_enabled(&self, family: PluginFamily, id: &str) -> bool {
        self.entry(family, id)
            .is_some_and(|e| e.status == PluginStatus::Enabled)
    }

    /// Number of entries in `family`.
    pub fn len_of(&self, family: PluginFamily) -> usize {
        self.read()
            .entries
            .iter()
            .filter(|e| e.definition.family() == family)
            .count()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    pub fn dev_tools(&self) -> Vec<DevToolDefinition> {
        self.payloads(PluginFamily::DevTool, |d| d.as_dev_tool().cloned())
    }

    pub fn renderers(&self) -> Vec<RendererInfo> {
        self.payloads(PluginFamily::Renderer, |d| d.as_renderer().cloned())
    }

    pub fn generation_ui(&self) -> Vec<GenerationUiExtension> {
        self.payloads(PluginFamily::GenerationUi, |d| d.as_generation_ui().cloned())
    }

    pub fn node_types(&self) -> Vec<NodeTypeDefinition> {
        self.payloads(PluginFamily::NodeType, |d| d.as_node_type().cloned())
    }

    fn payloads<T>(
        &self,
        family: PluginFamily,
        extract: impl Fn(&PluginDefinition) -> Option<T>,
    ) -> Vec<T> {
        self.read()
            .entries
            .iter()
            .filter(|e| e.definition.family() == family)
            .filter_map(|e| extract(&e.definition))
            .collect()
    }

    /// Drop every entry of `family`, keeping the others in order.
    ///
    /// Returns how many entries were removed.
    pub fn remove_family(&self, family: PluginFamily) -> usize {
        let mut state = self.write();
        let before = state.entries.len();
        state.entries.retain(|e| e.definition.family() != family);
        let index = state
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| ((e.definition.family(), e.definition.id.clone()), i))
            .collect();
        state.index = index;
        before - state.entries.len()
    }

    /// Drop every entry.
    pub fn reset(&self) {
        let mut state = self.write();
        state.entries.clear();
        state.index.clear();
    }
}

impl Default for PluginCatalog {
    fn default() -> Self {
        Self::new(Diagnostics::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{Origin, PluginPayload, Source};
    use std::sync::Arc;

    fn dev_tool(id: &str, label: &str) -> PluginDefinition {
        PluginDefinition::builtin(id, PluginPayload::DevTool(DevToolDefinition::new(id, label)))
    }

    fn renderer(node_type: &str) -> PluginDefinition {
        PluginDefinition::builtin(
            node_type,
            PluginPayload::Renderer(RendererInfo {
                node_type: node_type.to_string(),
                component: format!("{node_type}-view"),
                priority: 1,
            }),
        )
    }

    #[test]
    fn register_and_get_roundtrip() {
        let catalog = PluginCatalog::default();
        assert!(catalog.register(dev_tool("inspector", "Inspector")).is_inserted());

        let def = catalog.get(PluginFamily::DevTool, "inspector").unwrap();
        assert_eq!(def.id, "inspector");
        assert_eq!(def.origin, Origin::Builtin);
        assert!(catalog.get(PluginFamily::Renderer, "inspector").is_none());
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        let (diagnostics, memory) = Diagnostics::recording();
        let catalog = PluginCatalog::new(diagnostics);

        catalog.register(dev_tool("inspector", "First"));
        let outcome = catalog.register(dev_tool("inspector", "Second"));

        assert_eq!(outcome, RegisterOutcome::Duplicate);
        assert_eq!(catalog.len_of(PluginFamily::DevTool), 1);
        assert_eq!(catalog.dev_tools()[0].label, "First");
        assert_eq!(
            memory.count(|k| matches!(k, DiagnosticKind::DuplicateRegistration { .. })),
            1
        );
    }

    #[test]
    fn remove_family_keeps_other_families_addressable() {
        let catalog = PluginCatalog::default();
        catalog.register(renderer("video"));
        catalog.register(dev_tool("inspector", "Inspector"));
        catalog.register(renderer("choice"));
        catalog.register(dev_tool("profiler", "Profiler"));

        assert_eq!(catalog.remove_family(PluginFamily::Renderer), 2);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.contains(PluginFamily::Renderer, "video"));
        assert_eq!(catalog.get(PluginFamily::DevTool, "profiler").unwrap().id, "profiler");
        catalog.set_enabled(PluginFamily::DevTool, "profiler", false).unwrap();
        assert!(!catalog.is_enabled(PluginFamily::DevTool, "profiler"));
        assert!(catalog.is_enabled(PluginFamily::DevTool, "inspector"));

        assert!(catalog.register(renderer("video")).is_inserted());
        assert_eq!(catalog.remove_family(PluginFamily::NodeType), 0);
    }

    #[test]
    fn same_id_in_different_families_is_allowed() {
        let catalog = PluginCatalog::default();
        catalog.register(dev_tool("video", "Video"));
        assert!(catalog.register(renderer("video")).is_inserted());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn get_all_preserves_insertion_order_and_filters() {
        let catalog = PluginCatalog::default();
        catalog.register(dev_tool("zebra", "Z"));
        catalog.register(renderer("choice"));
        catalog.register(dev_tool("alpha", "A"));

        let ids: Vec<String> = catalog.get_all(None).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["zebra", "choice", "alpha"]);

        let tools: Vec<String> = catalog
            .get_all(Some(PluginFamily::DevTool))
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(tools, vec!["zebra", "alpha"]);
    }

    #[test]
    fn set_enabled_respects_can_disable() {
        let catalog = PluginCatalog::default();
        catalog.register(dev_tool("optional", "Optional"));
        catalog.register(dev_tool("pinned", "Pinned").with_can_disable(false));

        catalog
            .set_enabled(PluginFamily::DevTool, "optional", false)
            .unwrap();
        assert!(!catalog.is_enabled(PluginFamily::DevTool, "optional"));
        assert_eq!(catalog.enabled(PluginFamily::DevTool).len(), 1);

        let err = catalog
            .set_enabled(PluginFamily::DevTool, "pinned", false)
            .unwrap_err();
        assert!(matches!(err, AtelierError::CannotDisable { .. }));

        let err = catalog
            .set_enabled(PluginFamily::DevTool, "missing", true)
            .unwrap_err();
        assert!(matches!(err, AtelierError::PluginNotFound { .. }));
    }

    #[test]
    fn reset_empties_catalog() {
        let catalog = PluginCatalog::default();
        catalog.register(dev_tool("a", "A").with_source(Source::Discovered));
        catalog.reset();
        assert!(catalog.is_empty());
        assert!(catalog.register(dev_tool("a", "A")).is_inserted());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registration_inserts_once() {
        let catalog = Arc::new(PluginCatalog::default());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let catalog = catalog.clone();
                tokio::spawn(async move {
                    catalog.register(dev_tool("shared", &format!("writer {i}")))
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().is_inserted() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(catalog.len_of(PluginFamily::DevTool), 1);
    }
}
