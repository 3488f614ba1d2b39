// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Atelier integration tests.
//!
//! Provides scripted modules, scripted component loaders, and a small
//! harness that wires the registries together with a recording
//! diagnostics sink.
//!
//! # Components
//!
//! - [`MockModule`] - Feature module whose `initialize()` succeeds, fails, hangs, or panics on demand
//! - [`MockLoader`] - Component loader with a call counter, optional delay, and optional failure
//! - [`TestShell`] - Registries, module registry, and a [`MemorySink`](atelier_core::MemorySink) in one place

pub mod harness;
pub mod mock_component;
pub mod mock_module;

pub use harness::TestShell;
pub use mock_component::{MockComponent, MockLoader, mock_loader};
pub use mock_module::{InitLog, MockModule};
