// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin catalog, capability registry, and user plugin manifests.
//!
//! The catalog is the shared store every other registry writes through.
//! Registration is first-wins per `(family, id)`, so the same artifact can
//! be registered from several code paths without coordination.

pub mod capability;
pub mod catalog;
pub mod manifest;

pub use capability::{Capability, CapabilityRegistry};
pub use catalog::{CatalogEntry, PluginCatalog, PluginStatus, RegisterOutcome};
pub use manifest::{ManifestScan, load_manifest_dir, parse_plugin_manifest};
