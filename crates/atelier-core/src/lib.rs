// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Atelier shell runtime.
//!
//! This crate provides the error type, the plugin types stored in the
//! catalog, and the structured diagnostics channel shared by every
//! registry in the workspace.

pub mod diagnostics;
pub mod error;
pub mod types;

pub use diagnostics::{
    DiagnosticEvent, DiagnosticKind, DiagnosticSink, Diagnostics, MemorySink, Severity,
    TracingSink,
};
pub use error::AtelierError;
pub use types::{
    DevToolDefinition, GenerationUiExtension, LoadStrategy, NodeTypeDefinition, Origin,
    PluginDefinition, PluginFamily, PluginPayload, RendererInfo, RendererRef, Source,
};
