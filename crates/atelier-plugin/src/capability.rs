// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat keyed store of feature capabilities.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use atelier_core::{AtelierError, DiagnosticKind, Diagnostics};
use serde::{Deserialize, Serialize};

use crate::catalog::RegisterOutcome;

/// A flagged record indicating a feature is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    /// The feature (module) that owns this capability.
    pub feature_id: String,
    pub enabled: bool,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Capability {
    /// An enabled capability with no metadata.
    pub fn new(id: impl Into<String>, feature_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            feature_id: feature_id.into(),
            enabled: true,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Default)]
struct CapabilityState {
    order: Vec<String>,
    by_id: HashMap<String, Capability>,
}

/// Registry of capabilities keyed by id.
#[derive(Debug)]
pub struct CapabilityRegistry {
    state: RwLock<CapabilityState>,
    diagnostics: Diagnostics,
}

impl CapabilityRegistry {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            state: RwLock::new(CapabilityState::default()),
            diagnostics,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CapabilityState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CapabilityState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a capability; an id that is already present is left untouched.
    pub fn register(&self, capability: Capability) -> RegisterOutcome {
        let id = capability.id.clone();
        let inserted = {
            let mut state = self.write();
            if state.by_id.contains_key(&id) {
                false
            } else {
                state.order.push(id.clone());
                state.by_id.insert(id.clone(), capability);
                true
            }
        };

        if inserted {
            tracing::debug!(capability = %id, "capability registered");
            RegisterOutcome::Inserted
        } else {
            self.diagnostics.warn(
                DiagnosticKind::DuplicateRegistration {
                    registry: "capability".to_string(),
                    id: id.clone(),
                },
                format!("[CapabilityRegistry] Capability {id} is already registered, ignoring"),
            );
            RegisterOutcome::Duplicate
        }
    }

    pub fn get(&self, id: &str) -> Option<Capability> {
        self.read().by_id.get(id).cloned()
    }

    /// True only if the capability exists and is enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.read().by_id.get(id).is_some_and(|c| c.enabled)
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), AtelierError> {
        let mut state = self.write();
        let capability = state
            .by_id
            .get_mut(id)
            .ok_or_else(|| AtelierError::CapabilityNotFound { id: id.to_string() })?;
        capability.enabled = enabled;
        Ok(())
    }

    /// All capabilities in registration order.
    pub fn list(&self) -> Vec<Capability> {
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|id| state.by_id.get(id).cloned())
            .collect()
    }

    /// Capabilities owned by one feature.
    pub fn for_feature(&self, feature_id: &str) -> Vec<Capability> {
        self.list()
            .into_iter()
            .filter(|c| c.feature_id == feature_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().order.is_empty()
    }

    pub fn reset(&self) {
        let mut state = self.write();
        state.order.clear();
        state.by_id.clear();
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new(Diagnostics::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_get_and_query() {
        let registry = CapabilityRegistry::default();
        registry.register(
            Capability::new("world.time", "world")
                .with_metadata(serde_json::json!({ "calendar": "gregorian" })),
        );
        registry.register(Capability::new("world.weather", "world").disabled());
        registry.register(Capability::new("scene.graph", "scene"));

        assert!(registry.is_enabled("world.time"));
        assert!(!registry.is_enabled("world.weather"));
        assert!(!registry.is_enabled("missing"));
        assert_eq!(
            registry.get("world.time").unwrap().metadata["calendar"],
            "gregorian"
        );
        assert_eq!(registry.for_feature("world").len(), 2);
    }

    #[test]
    fn duplicate_is_ignored() {
        let (diagnostics, memory) = Diagnostics::recording();
        let registry = CapabilityRegistry::new(diagnostics);
        registry.register(Capability::new("x", "first"));
        let outcome = registry.register(Capability::new("x", "second"));

        assert_eq!(outcome, RegisterOutcome::Duplicate);
        assert_eq!(registry.get("x").unwrap().feature_id, "first");
        assert_eq!(memory.events().len(), 1);
    }

    #[test]
    fn list_keeps_registration_order() {
        let registry = CapabilityRegistry::default();
        for id in ["c", "a", "b"] {
            registry.register(Capability::new(id, "f"));
        }
        let ids: Vec<String> = registry.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn toggle_and_reset() {
        let registry = CapabilityRegistry::default();
        registry.register(Capability::new("x", "f"));
        registry.set_enabled("x", false).unwrap();
        assert!(!registry.is_enabled("x"));
        assert!(matches!(
            registry.set_enabled("y", true),
            Err(AtelierError::CapabilityNotFound { id }) if id == "y"
        ));

        registry.reset();
        assert!(registry.is_empty());
    }
}
