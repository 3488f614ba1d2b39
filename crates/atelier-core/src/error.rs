// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Atelier shell runtime.
//!
//! Structural errors (duplicate module ids, unknown dependencies, cycles)
//! abort bootstrap before any module runs. Everything else is isolated to
//! the offending unit and surfaced through the diagnostics channel.

use thiserror::Error;

/// The primary error type used across all Atelier registries and the bootstrap sequence.
#[derive(Debug, Error)]
pub enum AtelierError {
    /// Two modules were registered with the same id.
    #[error("duplicate module id `{id}`")]
    DuplicateModuleId { id: String },

    /// A module lists a dependency that was never registered.
    #[error("module `{module}` depends on unknown module `{dependency}`")]
    UnknownDependency { module: String, dependency: String },

    /// The module dependency graph contains a cycle.
    #[error("cyclic module dependency: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// The modules forming the cycle, first element repeated at the end.
        cycle: Vec<String>,
    },

    /// A module's `initialize()` returned an error.
    #[error("module `{module}` failed to initialize: {message}")]
    ModuleInitialization { module: String, message: String },

    /// `bootstrap()` was called on a registry that already ran it.
    #[error("module registry has already been bootstrapped")]
    AlreadyBootstrapped,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A renderer component loader failed.
    #[error("renderer for `{node_type}` failed to load: {message}")]
    RendererLoad { node_type: String, message: String },

    /// A node type references a renderer component that is not in the library.
    #[error("node type `{node_type}` references missing renderer component `{component}`")]
    MissingRendererComponent { node_type: String, component: String },

    /// Requested plugin was not found in the catalog.
    #[error("plugin not found: {family}/{id}")]
    PluginNotFound { family: String, id: String },

    /// No capability is registered under this id.
    #[error("capability not found: {id}")]
    CapabilityNotFound { id: String },

    /// The plugin is registered with `can_disable = false`.
    #[error("plugin {family}/{id} cannot be disabled")]
    CannotDisable { family: String, id: String },

    /// Plugin manifest could not be parsed or failed validation.
    #[error("invalid plugin manifest: {0}")]
    Manifest(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AtelierError {
    /// Returns true for errors that indicate a build-time defect in the module set.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AtelierError::DuplicateModuleId { .. }
                | AtelierError::UnknownDependency { .. }
                | AtelierError::CyclicDependency { .. }
        )
    }
}
