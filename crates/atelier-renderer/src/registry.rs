// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderer registry: maps node types to loadable components.
//!
//! Each node type has at most one renderer (first registration wins). A
//! renderer's component is loaded at most once per process: the outcome of
//! the first load, success or failure, is memoized. A cached failure is
//! only retried through [`RendererRegistry::retry`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use atelier_core::{
    AtelierError, DiagnosticKind, Diagnostics, LoadStrategy, PluginDefinition, PluginFamily,
    PluginPayload, RendererInfo,
};
use atelier_plugin::{PluginCatalog, RegisterOutcome};
use futures::future::join_all;
use tokio::sync::OnceCell;

use crate::component::{ComponentHandle, ComponentLoader, NamedComponent};

/// Component returned when a node type has no usable renderer.
pub const FALLBACK_COMPONENT: &str = "FallbackRenderer";

/// A renderer registration.
#[derive(Debug, Clone)]
pub struct RendererEntry {
    pub node_type: String,
    /// Name of the component the loader produces.
    pub component: String,
    pub priority: u32,
    /// `Eager` entries are preloaded regardless of priority.
    pub strategy: LoadStrategy,
    pub loader: ComponentLoader,
}

impl RendererEntry {
    pub fn new(
        node_type: impl Into<String>,
        component: impl Into<String>,
        priority: u32,
        loader: ComponentLoader,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            component: component.into(),
            priority,
            strategy: LoadStrategy::Lazy,
            loader,
        }
    }

    pub fn eager(mut self) -> Self {
        self.strategy = LoadStrategy::Eager;
        self
    }
}

/// Load state of a registered renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererState {
    Unresolved,
    Resolved,
    Failed(String),
}

type LoadCell = OnceCell<Result<ComponentHandle, String>>;

struct Slot {
    entry: RendererEntry,
    cell: Mutex<Arc<LoadCell>>,
}

impl Slot {
    fn cell(&self) -> Arc<LoadCell> {
        self.cell
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Outcome of [`RendererRegistry::preload_high_priority`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub resolved: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Default)]
struct SlotTable {
    order: Vec<String>,
    slots: HashMap<String, Arc<Slot>>,
}

/// Registry of node-type renderers.
pub struct RendererRegistry {
    table: RwLock<SlotTable>,
    catalog: Arc<PluginCatalog>,
    pub(crate) diagnostics: Diagnostics,
    fallback: ComponentHandle,
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("renderers", &self.len())
            .finish()
    }
}

impl RendererRegistry {
    pub fn new(catalog: Arc<PluginCatalog>, diagnostics: Diagnostics) -> Self {
        Self {
            table: RwLock::new(SlotTable::default()),
            catalog,
            diagnostics,
            fallback: NamedComponent::handle(FALLBACK_COMPONENT),
        }
    }

    fn slot(&self, node_type: &str) -> Option<Arc<Slot>> {
        self.table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .slots
            .get(node_type)
            .cloned()
    }

    fn slots(&self) -> Vec<Arc<Slot>> {
        let table = self
            .table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        table
            .order
            .iter()
            .filter_map(|t| table.slots.get(t).cloned())
            .collect()
    }

    /// Register a renderer; a node type that already has one keeps it.
    ///
    /// Inserted renderers are mirrored into the plugin catalog.
    pub fn register(&self, entry: RendererEntry) -> RegisterOutcome {
        let node_type = entry.node_type.clone();
        let info = RendererInfo {
            node_type: node_type.clone(),
            component: entry.component.clone(),
            priority: entry.priority,
        };

        let inserted = {
            let mut table = self
                .table
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if table.slots.contains_key(&node_type) {
                false
            } else {
                table.order.push(node_type.clone());
                table.slots.insert(
                    node_type.clone(),
                    Arc::new(Slot {
                        entry,
                        cell: Mutex::new(Arc::new(OnceCell::new())),
                    }),
                );
                true
            }
        };

        if !inserted {
            self.diagnostics.warn(
                DiagnosticKind::DuplicateRegistration {
                    registry: "renderer".to_string(),
                    id: node_type.clone(),
                },
                format!("[RendererRegistry] Renderer for {node_type} already registered, ignoring"),
            );
            return RegisterOutcome::Duplicate;
        }

        self.catalog.register(PluginDefinition::builtin(
            node_type.clone(),
            PluginPayload::Renderer(info),
        ));
        tracing::debug!(node_type = %node_type, "renderer registered");
        RegisterOutcome::Inserted
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.slot(node_type).is_some()
    }

    /// Every registration in insertion order, as registered.
    ///
    /// Load progress is reported by [`state`](Self::state), not here.
    pub fn entries(&self) -> Vec<RendererEntry> {
        self.slots().iter().map(|s| s.entry.clone()).collect()
    }

    pub fn state(&self, node_type: &str) -> Option<RendererState> {
        let slot = self.slot(node_type)?;
        let cell = slot.cell();
        Some(match cell.get() {
            None => RendererState::Unresolved,
            Some(Ok(_)) => RendererState::Resolved,
            Some(Err(reason)) => RendererState::Failed(reason.clone()),
        })
    }

    /// The component for `node_type` if it has already been resolved.
    pub fn get(&self, node_type: &str) -> Option<ComponentHandle> {
        let slot = self.slot(node_type)?;
        let cell = slot.cell();
        match cell.get() {
            Some(Ok(component)) => Some(component.clone()),
            _ => None,
        }
    }

    /// Load `node_type`'s component on first use and memoize the outcome.
    pub async fn resolve_lazy(&self, node_type: &str) -> Result<ComponentHandle, AtelierError> {
        let slot = self.slot(node_type).ok_or_else(|| AtelierError::RendererLoad {
            node_type: node_type.to_string(),
            message: "no renderer registered".to_string(),
        })?;
        let cell = slot.cell();

        let outcome = cell
            .get_or_init(|| async {
                match slot.entry.loader.load().await {
                    Ok(component) => {
                        tracing::debug!(node_type = %node_type, "renderer resolved");
                        Ok(component)
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        self.diagnostics.error(
                            DiagnosticKind::RendererLoadFailed {
                                node_type: node_type.to_string(),
                                reason: reason.clone(),
                            },
                            format!("[RendererRegistry] Failed to load renderer for {node_type}: {reason}"),
                        );
                        Err(reason)
                    }
                }
            })
            .await;

        outcome.clone().map_err(|message| AtelierError::RendererLoad {
            node_type: node_type.to_string(),
            message,
        })
    }

    /// Resolve `node_type`, substituting the fallback component on any failure.
    pub async fn resolve_or_fallback(&self, node_type: &str) -> ComponentHandle {
        match self.resolve_lazy(node_type).await {
            Ok(component) => component,
            Err(_) => self.fallback.clone(),
        }
    }

    /// Forget a cached load failure so the next resolution calls the loader again.
    ///
    /// Returns `false` if the renderer is unknown or not in the failed state.
    pub fn retry(&self, node_type: &str) -> bool {
        let Some(slot) = self.slot(node_type) else {
            return false;
        };
        let mut cell = slot
            .cell
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if matches!(cell.get(), Some(Err(_))) {
            *cell = Arc::new(OnceCell::new());
            true
        } else {
            false
        }
    }

    /// Concurrently resolve every renderer with `priority > threshold` or an
    /// `Eager` strategy. Individual failures are logged and reported, never
    /// propagated.
    pub async fn preload_high_priority(&self, threshold: u32) -> PreloadReport {
        let selected: Vec<Arc<Slot>> = self
            .slots()
            .into_iter()
            .filter(|s| s.entry.priority > threshold || s.entry.strategy == LoadStrategy::Eager)
            .collect();

        let outcomes = join_all(selected.iter().map(|slot| async move {
            let node_type = slot.entry.node_type.clone();
            let result = self.resolve_lazy(&node_type).await;
            (node_type, result.is_ok())
        }))
        .await;

        let mut report = PreloadReport::default();
        for (node_type, ok) in outcomes {
            if ok {
                report.resolved.push(node_type);
            } else {
                report.failed.push(node_type);
            }
        }

        self.diagnostics.info(
            DiagnosticKind::RendererPreloadCompleted {
                resolved: report.resolved.len(),
                failed: report.failed.len(),
            },
            format!(
                "[RendererRegistry] Preloaded {} renderers ({} failed)",
                report.resolved.len(),
                report.failed.len()
            ),
        );
        report
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

    /// Drop every registration, cached component, and catalog mirror entry.
    pub fn reset(&self) {
        {
            let mut table = self
                .table
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            table.order.clear();
            table.slots.clear();
        }
        self.catalog.remove_family(PluginFamily::Renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::Severity;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_loader(name: &'static str, calls: Arc<AtomicUsize>) -> ComponentLoader {
        ComponentLoader::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(NamedComponent::handle(name)) }
        })
    }

    fn failing_loader(calls: Arc<AtomicUsize>) -> ComponentLoader {
        ComponentLoader::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AtelierError::Internal("chunk missing".into())) }
        })
    }

    fn registry() -> (RendererRegistry, Arc<PluginCatalog>) {
        let catalog = Arc::new(PluginCatalog::default());
        (RendererRegistry::new(catalog.clone(), Diagnostics::new()), catalog)
    }

    #[test]
    fn first_registration_wins_and_mirrors_into_catalog() {
        let (diagnostics, memory) = Diagnostics::recording();
        let catalog = Arc::new(PluginCatalog::default());
        let registry = RendererRegistry::new(catalog.clone(), diagnostics);
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register(RendererEntry::new("video", "VideoA", 10, counting_loader("A", calls.clone())));
        let outcome =
            registry.register(RendererEntry::new("video", "VideoB", 1, counting_loader("B", calls)));

        assert_eq!(outcome, RegisterOutcome::Duplicate);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].component, "VideoA");
        let info = catalog.renderers();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].priority, 10);
        assert!(catalog.contains(PluginFamily::Renderer, "video"));
        assert_eq!(
            memory.at_least(Severity::Warn).len(),
            1,
            "duplicate renderer should warn like the catalog does"
        );
    }

    #[tokio::test]
    async fn resolve_lazy_memoizes_success() {
        let (registry, _) = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register(RendererEntry::new("tooltip", "Tooltip", 3, counting_loader("Tooltip", calls.clone())));

        assert!(registry.get("tooltip").is_none());
        assert_eq!(registry.state("tooltip"), Some(RendererState::Unresolved));

        let first = registry.resolve_lazy("tooltip").await.unwrap();
        let second = registry.resolve_lazy("tooltip").await.unwrap();
        assert_eq!(first.name(), "Tooltip");
        assert_eq!(second.name(), "Tooltip");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.get("tooltip").is_some());
    }

    #[tokio::test]
    async fn failures_are_cached_until_retry() {
        let (diagnostics, memory) = Diagnostics::recording();
        let registry = RendererRegistry::new(Arc::new(PluginCatalog::default()), diagnostics);
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register(RendererEntry::new("broken", "Broken", 1, failing_loader(calls.clone())));

        assert!(registry.resolve_lazy("broken").await.is_err());
        assert!(registry.resolve_lazy("broken").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(registry.state("broken"), Some(RendererState::Failed(_))));
        assert_eq!(
            memory.count(|k| matches!(k, DiagnosticKind::RendererLoadFailed { .. })),
            1
        );

        assert!(registry.retry("broken"));
        assert_eq!(registry.state("broken"), Some(RendererState::Unresolved));
        assert!(registry.resolve_lazy("broken").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_ignores_healthy_renderers() {
        let (registry, _) = registry();
        registry.register(RendererEntry::new(
            "ok",
            "Ok",
            1,
            ComponentLoader::ready(NamedComponent::handle("Ok")),
        ));
        assert!(!registry.retry("ok"));
        registry.resolve_lazy("ok").await.unwrap();
        assert!(!registry.retry("ok"));
        assert!(!registry.retry("missing"));
    }

    #[tokio::test]
    async fn fallback_covers_unknown_and_failed() {
        let (registry, _) = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register(RendererEntry::new("broken", "Broken", 1, failing_loader(calls)));

        assert_eq!(registry.resolve_or_fallback("broken").await.name(), FALLBACK_COMPONENT);
        assert_eq!(registry.resolve_or_fallback("unknown").await.name(), FALLBACK_COMPONENT);
    }

    #[tokio::test]
    async fn entries_report_configured_strategy_after_preload() {
        let (registry, _) = registry();
        registry.register(RendererEntry::new(
            "video",
            "Video",
            10,
            ComponentLoader::ready(NamedComponent::handle("Video")),
        ));
        registry.register(RendererEntry::new(
            "choice",
            "Choice",
            9,
            failing_loader(Arc::new(AtomicUsize::new(0))),
        ));

        let report = registry.preload_high_priority(7).await;

        assert_eq!(report.failed, vec!["choice"]);
        let strategies: Vec<LoadStrategy> = registry.entries().iter().map(|e| e.strategy).collect();
        assert_eq!(strategies, vec![LoadStrategy::Lazy, LoadStrategy::Lazy]);
        assert_eq!(registry.state("video"), Some(RendererState::Resolved));
        assert!(matches!(registry.state("choice"), Some(RendererState::Failed(_))));
    }

    #[tokio::test]
    async fn eager_strategy_forces_preload() {
        let (registry, _) = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register(
            RendererEntry::new("start", "Start", 0, counting_loader("Start", calls.clone())).eager(),
        );
        registry.register(RendererEntry::new("note", "Note", 0, counting_loader("Note", calls)));

        let report = registry.preload_high_priority(7).await;
        assert_eq!(report.resolved, vec!["start"]);
        assert_eq!(registry.state("note"), Some(RendererState::Unresolved));
    }

    #[test]
    fn reset_clears_registrations_and_catalog_mirror() {
        let (diagnostics, memory) = Diagnostics::recording();
        let catalog = Arc::new(PluginCatalog::new(diagnostics.clone()));
        let registry = RendererRegistry::new(catalog.clone(), diagnostics);
        catalog.register(PluginDefinition::builtin(
            "inspector",
            PluginPayload::DevTool(atelier_core::DevToolDefinition::new("inspector", "Inspector")),
        ));
        registry.register(RendererEntry::new(
            "video",
            "OldVideo",
            10,
            ComponentLoader::ready(NamedComponent::handle("OldVideo")),
        ));

        registry.reset();
        assert!(registry.is_empty());
        assert!(!registry.contains("video"));
        assert_eq!(catalog.len_of(PluginFamily::Renderer), 0);
        assert!(catalog.contains(PluginFamily::DevTool, "inspector"));

        let outcome = registry.register(RendererEntry::new(
            "video",
            "NewVideo",
            2,
            ComponentLoader::ready(NamedComponent::handle("NewVideo")),
        ));
        assert_eq!(outcome, RegisterOutcome::Inserted);
        let info = catalog.renderers();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].component, "NewVideo");
        assert_eq!(info[0].priority, 2);
        assert_eq!(
            memory.count(|k| matches!(k, DiagnosticKind::DuplicateRegistration { .. })),
            0
        );
    }
}
