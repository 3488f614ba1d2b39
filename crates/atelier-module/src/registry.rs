// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module set ownership and dependency ordering.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use atelier_core::{AtelierError, Diagnostics};

use crate::descriptor::FeatureModule;

/// Where a module stands in the bootstrap lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Registered, not yet attempted.
    Pending,
    Initialized,
    /// `initialize()` returned an error, panicked, or timed out.
    Failed { reason: String },
    /// Skipped because `blocked_by` did not initialize.
    Blocked { blocked_by: String },
}

impl ModuleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ModuleStatus::Pending => "pending",
            ModuleStatus::Initialized => "initialized",
            ModuleStatus::Failed { .. } => "failed",
            ModuleStatus::Blocked { .. } => "blocked",
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, ModuleStatus::Initialized)
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleStatus::Failed { reason } => write!(f, "failed ({reason})"),
            ModuleStatus::Blocked { blocked_by } => write!(f, "blocked by {blocked_by}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Owns the declared feature modules and their initialization order.
pub struct ModuleRegistry {
    pub(crate) modules: Vec<Arc<dyn FeatureModule>>,
    index: HashMap<String, usize>,
    pub(crate) statuses: HashMap<String, ModuleStatus>,
    pub(crate) bootstrapped: bool,
    pub(crate) diagnostics: Diagnostics,
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.modules.iter().map(|m| m.id()).collect::<Vec<_>>())
            .field("bootstrapped", &self.bootstrapped)
            .finish()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new(Diagnostics::new())
    }
}

impl ModuleRegistry {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            modules: Vec::new(),
            index: HashMap::new(),
            statuses: HashMap::new(),
            bootstrapped: false,
            diagnostics,
        }
    }

    /// Append a module to the set.
    ///
    /// Dependencies are not checked here; modules may be registered in any
    /// order and unknown ids surface from [`resolve_order`](Self::resolve_order).
    pub fn register_module(&mut self, module: Arc<dyn FeatureModule>) -> Result<(), AtelierError> {
        let id = module.id().to_string();
        if self.index.contains_key(&id) {
            return Err(AtelierError::DuplicateModuleId { id });
        }
        tracing::debug!(module = %id, "registered module");
        self.index.insert(id.clone(), self.modules.len());
        self.statuses.insert(id, ModuleStatus::Pending);
        self.modules.push(module);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn FeatureModule>> {
        self.index.get(id).map(|&i| self.modules[i].clone())
    }

    /// Modules in registration order.
    pub fn list(&self) -> Vec<Arc<dyn FeatureModule>> {
        self.modules.clone()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules whose page carries a dev-tool descriptor, in registration order.
    pub fn modules_with_dev_tools(&self) -> Vec<Arc<dyn FeatureModule>> {
        self.modules
            .iter()
            .filter(|m| m.descriptor().dev_tool().is_some())
            .cloned()
            .collect()
    }

    pub fn status(&self, id: &str) -> Option<ModuleStatus> {
        self.statuses.get(id).cloned()
    }

    /// Every module's status, in registration order.
    pub fn statuses(&self) -> Vec<(String, ModuleStatus)> {
        self.modules
            .iter()
            .map(|m| {
                let status = self
                    .statuses
                    .get(m.id())
                    .cloned()
                    .unwrap_or(ModuleStatus::Pending);
                (m.id().to_string(), status)
            })
            .collect()
    }

    /// Ids of modules that completed `initialize()`.
    pub fn initialized(&self) -> Vec<String> {
        self.statuses()
            .into_iter()
            .filter(|(_, status)| status.is_initialized())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Drop every module and status so the registry can be reused.
    pub fn reset(&mut self) {
        self.modules.clear();
        self.index.clear();
        self.statuses.clear();
        self.bootstrapped = false;
    }

    /// Compute an initialization order where every dependency precedes its dependents.
    ///
    /// Among modules that are ready at the same time, higher `priority` goes
    /// first (no priority sorts below any priority), then registration order.
    pub fn resolve_order(&self) -> Result<Vec<String>, AtelierError> {
        for module in &self.modules {
            let descriptor = module.descriptor();
            if let Some(missing) = descriptor
                .depends_on
                .iter()
                .find(|dep| !self.index.contains_key(dep.as_str()))
            {
                return Err(AtelierError::UnknownDependency {
                    module: descriptor.id.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        let count = self.modules.len();
        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (i, module) in self.modules.iter().enumerate() {
            let mut seen = HashSet::new();
            for dep in &module.descriptor().depends_on {
                if !seen.insert(dep.as_str()) {
                    continue;
                }
                if let Some(&d) = self.index.get(dep.as_str()) {
                    dependents[d].push(i);
                    in_degree[i] += 1;
                }
            }
        }

        let mut ready: BinaryHeap<(Option<i32>, Reverse<usize>)> = (0..count)
            .filter(|&i| in_degree[i] == 0)
            .map(|i| (self.modules[i].descriptor().priority, Reverse(i)))
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some((_, Reverse(i))) = ready.pop() {
            order.push(self.modules[i].id().to_string());
            for &dependent in &dependents[i] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push((self.modules[dependent].descriptor().priority, Reverse(dependent)));
                }
            }
        }

        if order.len() < count {
            return Err(AtelierError::CyclicDependency {
                cycle: self.find_cycle(&in_degree),
            });
        }
        Ok(order)
    }

    /// Walk unresolved dependencies from the first stuck module until one repeats.
    ///
    /// Every module left with a non-zero in-degree has at least one
    /// dependency that is also stuck, so the walk always closes a loop.
    fn find_cycle(&self, in_degree: &[usize]) -> Vec<String> {
        let stuck = |i: usize| in_degree[i] > 0;
        let Some(start) = (0..self.modules.len()).find(|&i| stuck(i)) else {
            return Vec::new();
        };

        let mut path: Vec<usize> = Vec::new();
        let mut position: HashMap<usize, usize> = HashMap::new();
        let mut current = start;
        loop {
            if let Some(&at) = position.get(&current) {
                let mut cycle: Vec<String> = path[at..]
                    .iter()
                    .map(|&i| self.modules[i].id().to_string())
                    .collect();
                cycle.push(self.modules[current].id().to_string());
                return cycle;
            }
            position.insert(current, path.len());
            path.push(current);

            let next = self.modules[current]
                .descriptor()
                .depends_on
                .iter()
                .filter_map(|dep| self.index.get(dep.as_str()).copied())
                .find(|&d| stuck(d));
            match next {
                Some(d) => current = d,
                None => {
                    return path
                        .iter()
                        .map(|&i| self.modules[i].id().to_string())
                        .collect();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModuleContext;
    use crate::descriptor::{DevToolDescriptor, ModuleDescriptor, PageDescriptor};
    use async_trait::async_trait;

    struct Stub(ModuleDescriptor);

    #[async_trait]
    impl FeatureModule for Stub {
        fn descriptor(&self) -> &ModuleDescriptor {
            &self.0
        }

        async fn initialize(&self, _ctx: &ModuleContext) -> Result<(), AtelierError> {
            Ok(())
        }
    }

    fn module(id: &str, priority: Option<i32>, deps: &[&str]) -> Arc<dyn FeatureModule> {
        let mut descriptor = ModuleDescriptor::new(id, id).depends_on(deps.iter().copied());
        descriptor.priority = priority;
        Arc::new(Stub(descriptor))
    }

    fn registry(modules: Vec<Arc<dyn FeatureModule>>) -> ModuleRegistry {
        let mut registry = ModuleRegistry::default();
        for m in modules {
            registry.register_module(m).unwrap();
        }
        registry
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = registry(vec![module("a", None, &[])]);
        let err = registry.register_module(module("a", Some(9), &[])).unwrap_err();
        assert!(matches!(err, AtelierError::DuplicateModuleId { id } if id == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dependencies_come_first() {
        let registry = registry(vec![
            module("world", None, &["graph"]),
            module("graph", None, &["core"]),
            module("core", None, &[]),
        ]);
        assert_eq!(registry.resolve_order().unwrap(), vec!["core", "graph", "world"]);
    }

    #[test]
    fn ties_break_by_priority_then_registration() {
        let registry = registry(vec![
            module("a", None, &[]),
            module("b", Some(1), &[]),
            module("c", Some(5), &[]),
            module("d", Some(1), &[]),
            module("e", Some(-3), &[]),
        ]);
        assert_eq!(registry.resolve_order().unwrap(), vec!["c", "b", "d", "e", "a"]);
    }

    #[test]
    fn priority_does_not_override_dependencies() {
        let registry = registry(vec![
            module("low", Some(0), &[]),
            module("high", Some(100), &["low"]),
            module("mid", Some(50), &[]),
        ]);
        assert_eq!(registry.resolve_order().unwrap(), vec!["mid", "low", "high"]);
    }

    #[test]
    fn repeated_dependency_counts_once() {
        let registry = registry(vec![module("a", None, &[]), module("b", None, &["a", "a"])]);
        assert_eq!(registry.resolve_order().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let registry = registry(vec![module("a", None, &["ghost"])]);
        let err = registry.resolve_order().unwrap_err();
        assert!(matches!(
            err,
            AtelierError::UnknownDependency { module, dependency } if module == "a" && dependency == "ghost"
        ));
    }

    #[test]
    fn two_node_cycle_is_named() {
        let registry = registry(vec![
            module("free", None, &[]),
            module("a", None, &["b"]),
            module("b", None, &["a"]),
        ]);
        let err = registry.resolve_order().unwrap_err();
        assert_eq!(err.to_string(), "cyclic module dependency: a -> b -> a");
    }

    #[test]
    fn cycle_behind_a_tail_excludes_the_tail() {
        let registry = registry(vec![
            module("tail", None, &["x"]),
            module("x", None, &["y"]),
            module("y", None, &["z"]),
            module("z", None, &["x"]),
        ]);
        match registry.resolve_order().unwrap_err() {
            AtelierError::CyclicDependency { cycle } => {
                assert_eq!(cycle, vec!["x", "y", "z", "x"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let registry = registry(vec![module("loop", None, &["loop"])]);
        match registry.resolve_order().unwrap_err() {
            AtelierError::CyclicDependency { cycle } => assert_eq!(cycle, vec!["loop", "loop"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dev_tool_modules_are_filtered() {
        let with_tool: Arc<dyn FeatureModule> = Arc::new(Stub(ModuleDescriptor::new("t", "T").with_page(PageDescriptor {
            dev_tool: Some(DevToolDescriptor::default()),
            ..PageDescriptor::default()
        })));
        let page_only: Arc<dyn FeatureModule> = Arc::new(Stub(
            ModuleDescriptor::new("p", "P").with_page(PageDescriptor::default()),
        ));
        let registry = registry(vec![module("a", None, &[]), with_tool, page_only]);

        let ids: Vec<_> = registry
            .modules_with_dev_tools()
            .iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(ids, vec!["t"]);
    }

    #[test]
    fn reset_empties_the_registry() {
        let mut registry = registry(vec![module("a", None, &[])]);
        assert_eq!(registry.status("a"), Some(ModuleStatus::Pending));
        registry.reset();
        assert!(registry.is_empty());
        assert!(registry.status("a").is_none());
        registry.register_module(module("a", None, &[])).unwrap();
    }

    #[test]
    fn status_display() {
        let failed = ModuleStatus::Failed {
            reason: "boom".into(),
        };
        assert_eq!(failed.to_string(), "failed (boom)");
        assert_eq!(failed.label(), "failed");
        assert_eq!(ModuleStatus::Initialized.to_string(), "initialized");
    }
}
