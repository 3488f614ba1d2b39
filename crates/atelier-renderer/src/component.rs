// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderer components, their async loaders, and the named component library.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use atelier_core::AtelierError;
use futures::FutureExt;
use futures::future::BoxFuture;

/// A loaded UI component able to render one kind of node.
pub trait RendererComponent: Send + Sync {
    fn name(&self) -> &str;
}

/// Shared handle to a loaded component.
pub type ComponentHandle = Arc<dyn RendererComponent>;

/// A component identified only by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedComponent {
    name: String,
}

impl NamedComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn handle(name: impl Into<String>) -> ComponentHandle {
        Arc::new(Self::new(name))
    }
}

impl RendererComponent for NamedComponent {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Async factory producing a component handle.
#[derive(Clone)]
pub struct ComponentLoader {
    load: Arc<dyn Fn() -> BoxFuture<'static, Result<ComponentHandle, AtelierError>> + Send + Sync>,
}

impl std::fmt::Debug for ComponentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ComponentLoader")
    }
}

impl ComponentLoader {
    pub fn new<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ComponentHandle, AtelierError>> + Send + 'static,
    {
        Self {
            load: Arc::new(move || load().boxed()),
        }
    }

    /// A loader that resolves immediately to `component`.
    pub fn ready(component: ComponentHandle) -> Self {
        Self::new(move || {
            let component = component.clone();
            async move { Ok(component) }
        })
    }

    pub fn load(&self) -> BoxFuture<'static, Result<ComponentHandle, AtelierError>> {
        (self.load)()
    }
}

/// Component loaders addressable by name.
///
/// Node types reference their renderer by component name; the library is
/// where those names are resolved to loaders.
#[derive(Debug, Default)]
pub struct ComponentLibrary {
    loaders: RwLock<HashMap<String, ComponentLoader>>,
}

impl ComponentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a loader under `name`; an existing name keeps its first loader.
    pub fn insert(&self, name: impl Into<String>, loader: ComponentLoader) -> bool {
        let mut loaders = self
            .loaders
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let name = name.into();
        if loaders.contains_key(&name) {
            return false;
        }
        loaders.insert(name, loader);
        true
    }

    pub fn get(&self, name: &str) -> Option<ComponentLoader> {
        self.loaders
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.loaders
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.loaders
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
