// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature modules and the registry that brings them online.
//!
//! Modules declare their dependencies; [`ModuleRegistry::resolve_order`]
//! turns the declarations into a deterministic initialization order and
//! [`ModuleRegistry::bootstrap`] runs each module's `initialize()` against a
//! shared [`ModuleContext`], isolating failures to the offending module and
//! whatever depends on it.

pub mod bootstrap;
pub mod context;
pub mod descriptor;
pub mod registry;

pub use bootstrap::{BootstrapOptions, BootstrapReport, ModuleOutcome};
pub use context::ModuleContext;
pub use descriptor::{
    ActionDescriptor, DevToolDescriptor, FeatureModule, ModuleDescriptor, PageDescriptor,
};
pub use registry::{ModuleRegistry, ModuleStatus};
