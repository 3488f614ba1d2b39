// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atelier - an extensible editor shell.
//!
//! Features are declared as independently loadable modules and brought
//! online by the [`Shell`], which owns the plugin catalog, the capability,
//! renderer, and node-type registries, and the module registry.

pub mod features;
pub mod output;
pub mod shell;

pub use shell::{ManifestSummary, Shell, StartupReport};
