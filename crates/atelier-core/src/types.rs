// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the catalog, the registries, and feature modules.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies the family a catalog entry belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PluginFamily {
    DevTool,
    Renderer,
    GenerationUi,
    NodeType,
}

/// Provenance of a catalog entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Shipped with the shell.
    #[default]
    Builtin,
    /// Declared by the user through a plugin manifest.
    User,
}

/// How a catalog entry came to exist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Declared directly.
    #[default]
    Explicit,
    /// Inferred by scanning other registered structures.
    Discovered,
}

/// Whether a renderer is resolved during preload or on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    Eager,
    #[default]
    Lazy,
}

/// An operator-facing diagnostic panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevToolDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_dev_tool_category")]
    pub category: String,
    /// Name of the lazily loaded panel component.
    #[serde(default)]
    pub panel_component: Option<String>,
    #[serde(default)]
    pub route_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the tool may be shown outside dev mode.
    #[serde(default)]
    pub safe_for_non_dev: bool,
}

fn default_dev_tool_category() -> String {
    "misc".to_string()
}

impl DevToolDefinition {
    /// Creates a definition with only the required fields set.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            icon: None,
            category: default_dev_tool_category(),
            panel_component: None,
            route_path: None,
            tags: Vec::new(),
            safe_for_non_dev: false,
        }
    }

    /// A tool with neither a panel nor a route cannot be opened.
    pub fn is_reachable(&self) -> bool {
        self.panel_component.is_some() || self.route_path.is_some()
    }
}

/// Catalog view of a registered renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererInfo {
    pub node_type: String,
    pub component: String,
    pub priority: u32,
}

/// A UI extension contributed by a generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationUiExtension {
    pub id: String,
    /// The generation provider this extension decorates (e.g. "image", "voice").
    pub provider: String,
    pub label: String,
    #[serde(default)]
    pub panel_component: Option<String>,
    #[serde(default)]
    pub operations: Vec<String>,
}

/// Reference from a node type to the component that renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererRef {
    /// Component name looked up in the component library.
    pub component: String,
    #[serde(default)]
    pub priority: u32,
}

/// Structural definition of a scene graph node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub renderer: Option<RendererRef>,
}

/// Family-specific payload stored in the plugin catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginPayload {
    DevTool(DevToolDefinition),
    Renderer(RendererInfo),
    GenerationUi(GenerationUiExtension),
    NodeType(NodeTypeDefinition),
}

impl PluginPayload {
    /// The family this payload is filed under.
    pub fn family(&self) -> PluginFamily {
        match self {
            PluginPayload::DevTool(_) => PluginFamily::DevTool,
            PluginPayload::Renderer(_) => PluginFamily::Renderer,
            PluginPayload::GenerationUi(_) => PluginFamily::GenerationUi,
            PluginPayload::NodeType(_) => PluginFamily::NodeType,
        }
    }
}

/// The unit stored in the plugin catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginDefinition {
    pub id: String,
    pub origin: Origin,
    pub source: Source,
    pub payload: PluginPayload,
    pub can_disable: bool,
}

impl PluginDefinition {
    /// A built-in, explicitly declared, disableable definition.
    pub fn builtin(id: impl Into<String>, payload: PluginPayload) -> Self {
        Self {
            id: id.into(),
            origin: Origin::Builtin,
            source: Source::Explicit,
            payload,
            can_disable: true,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn with_can_disable(mut self, can_disable: bool) -> Self {
        self.can_disable = can_disable;
        self
    }

    pub fn family(&self) -> PluginFamily {
        self.payload.family()
    }

    pub fn as_dev_tool(&self) -> Option<&DevToolDefinition> {
        match &self.payload {
            PluginPayload::DevTool(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_renderer(&self) -> Option<&RendererInfo> {
        match &self.payload {
            PluginPayload::Renderer(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_generation_ui(&self) -> Option<&GenerationUiExtension> {
        match &self.payload {
            PluginPayload::GenerationUi(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn as_node_type(&self) -> Option<&NodeTypeDefinition> {
        match &self.payload {
            PluginPayload::NodeType(def) => Some(def),
            _ => None,
        }
    }
}
