// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renderer registry and preloader.
//!
//! Node types declare the component that renders them. Renderers above a
//! priority threshold are loaded concurrently during startup; the rest are
//! loaded on first use. Either way a component is loaded at most once.

pub mod component;
pub mod node_types;
pub mod registry;

pub use component::{
    ComponentHandle, ComponentLibrary, ComponentLoader, NamedComponent, RendererComponent,
};
pub use node_types::{AutoRegisterOptions, AutoRegisterReport, NodeTypeRegistry};
pub use registry::{
    FALLBACK_COMPONENT, PreloadReport, RendererEntry, RendererRegistry, RendererState,
};
