// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The feature module contract consumed from the surrounding application.

use async_trait::async_trait;
use atelier_core::AtelierError;

use crate::context::ModuleContext;

/// A user-invocable action exposed by a module page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
}

impl ActionDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
        }
    }
}

/// Optional dev-tool block on a module page.
///
/// Fields left empty are filled from the page and the module during discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevToolDescriptor {
    pub label: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub panel_component: Option<String>,
    pub route_path: Option<String>,
    pub tags: Vec<String>,
    pub safe_for_non_dev: bool,
}

/// UI surface contributed by a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDescriptor {
    /// Feature identifier; dev tools discovered from this page use it as their id.
    pub feature_id: Option<String>,
    pub route: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    /// Name of the lazily loaded page component.
    pub component: Option<String>,
    pub actions: Vec<ActionDescriptor>,
    pub dev_tool: Option<DevToolDescriptor>,
}

/// Static description of a feature module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub id: String,
    pub name: String,
    /// Tie-break among modules that are ready at the same time; higher first.
    pub priority: Option<i32>,
    pub depends_on: Vec<String>,
    pub page: Option<PageDescriptor>,
}

impl ModuleDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: None,
            depends_on: Vec::new(),
            page: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_page(mut self, page: PageDescriptor) -> Self {
        self.page = Some(page);
        self
    }

    /// The page's dev-tool block, if any.
    pub fn dev_tool(&self) -> Option<&DevToolDescriptor> {
        self.page.as_ref().and_then(|p| p.dev_tool.as_ref())
    }
}

/// A self-contained feature unit brought online during bootstrap.
///
/// `initialize()` is called exactly once, after every module listed in
/// `depends_on` has initialized successfully.
#[async_trait]
pub trait FeatureModule: Send + Sync + 'static {
    fn descriptor(&self) -> &ModuleDescriptor;

    /// Register the module's capabilities, renderers, node types, and plugins.
    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), AtelierError>;

    fn id(&self) -> &str {
        &self.descriptor().id
    }
}
