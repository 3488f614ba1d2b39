// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured diagnostics channel.
//!
//! Registries report recovered conditions (duplicate registrations, failed
//! loaders, unreachable dev tools, ordering hazards) as [`DiagnosticEvent`]s
//! rather than errors. [`Diagnostics`] fans each event out to its sinks:
//! [`TracingSink`] forwards to `tracing`, [`MemorySink`] records events so
//! tests can assert on them.

use std::sync::{Arc, Mutex};

use strum::Display;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

/// What a diagnostic event is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A `(family, id)` or keyed registration was already present and ignored.
    DuplicateRegistration { registry: String, id: String },
    /// A module finished `initialize()`.
    ModuleInitialized { module: String },
    /// A module's `initialize()` errored, panicked, or timed out.
    ModuleFailed { module: String, reason: String },
    /// A module was skipped because a dependency did not initialize.
    ModuleBlocked { module: String, blocked_by: String },
    /// A renderer component loader failed.
    RendererLoadFailed { node_type: String, reason: String },
    /// A node type references a component the library does not have.
    RendererComponentMissing { node_type: String, component: String },
    /// Preload finished.
    RendererPreloadCompleted { resolved: usize, failed: usize },
    /// A dev tool has neither a panel component nor a route.
    MisconfiguredDevTool { id: String },
    /// Discovery ran before any module was registered.
    OrderingHazard,
    /// Dev-tool discovery finished.
    DevToolsRegistered { count: usize },
}

impl DiagnosticKind {
    /// Stable identifier used as the `kind` field in log output.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateRegistration { .. } => "duplicate_registration",
            DiagnosticKind::ModuleInitialized { .. } => "module_initialized",
            DiagnosticKind::ModuleFailed { .. } => "module_failed",
            DiagnosticKind::ModuleBlocked { .. } => "module_blocked",
            DiagnosticKind::RendererLoadFailed { .. } => "renderer_load_failed",
            DiagnosticKind::RendererComponentMissing { .. } => "renderer_component_missing",
            DiagnosticKind::RendererPreloadCompleted { .. } => "renderer_preload_completed",
            DiagnosticKind::MisconfiguredDevTool { .. } => "misconfigured_dev_tool",
            DiagnosticKind::OrderingHazard => "ordering_hazard",
            DiagnosticKind::DevToolsRegistered { .. } => "dev_tools_registered",
        }
    }
}

/// A single structured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Human-readable message following the `[Component] ...` template.
    pub message: String,
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: &DiagnosticEvent);
}

/// Forwards events to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: &DiagnosticEvent) {
        let kind = event.kind.code();
        match event.severity {
            Severity::Debug => tracing::debug!(kind, "{}", event.message),
            Severity::Info => tracing::info!(kind, "{}", event.message),
            Severity::Warn => tracing::warn!(kind, "{}", event.message),
            Severity::Error => tracing::error!(kind, "{}", event.message),
        }
    }
}

/// Records every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DiagnosticKind) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|e| predicate(&e.kind))
            .count()
    }

    /// Recorded events at or above `severity`.
    pub fn at_least(&self, severity: Severity) -> Vec<DiagnosticEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity >= severity)
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: &DiagnosticEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Cheaply cloneable handle that fans events out to a fixed set of sinks.
#[derive(Clone)]
pub struct Diagnostics {
    sinks: Arc<Vec<Arc<dyn DiagnosticSink>>>,
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Diagnostics {
    /// A channel that only forwards to `tracing`.
    pub fn new() -> Self {
        Self::with_sinks(vec![Arc::new(TracingSink)])
    }

    pub fn with_sinks(sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self {
            sinks: Arc::new(sinks),
        }
    }

    /// A channel that forwards to `tracing` and records into the returned sink.
    pub fn recording() -> (Self, Arc<MemorySink>) {
        let memory = Arc::new(MemorySink::new());
        let diagnostics = Self::with_sinks(vec![
            Arc::new(TracingSink),
            memory.clone() as Arc<dyn DiagnosticSink>,
        ]);
        (diagnostics, memory)
    }

    pub fn emit(&self, severity: Severity, kind: DiagnosticKind, message: impl Into<String>) {
        let event = DiagnosticEvent {
            severity,
            kind,
            message: message.into(),
        };
        for sink in self.sinks.iter() {
            sink.emit(&event);
        }
    }

    pub fn debug(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.emit(Severity::Debug, kind, message);
    }

    pub fn info(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.emit(Severity::Info, kind, message);
    }

    pub fn warn(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.emit(Severity::Warn, kind, message);
    }

    pub fn error(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.emit(Severity::Error, kind, message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
