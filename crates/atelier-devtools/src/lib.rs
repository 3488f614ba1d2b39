// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dev-tool panels for the Atelier shell.
//!
//! Dev tools reach the catalog from two places: explicit definitions
//! (the built-ins plus any user manifests) and module pages that carry a
//! dev-tool descriptor. Explicit registration always runs first.

pub mod builtin;
pub mod discovery;

pub use builtin::{
    MODULE_INSPECTOR, PLUGIN_CATALOG, RENDERER_STATUS, builtin_dev_tool_plugins, builtin_dev_tools,
};
pub use discovery::{DevToolRegistry, DevToolReport, discovered_definition};
