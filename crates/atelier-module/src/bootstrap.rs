// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure-isolated module bootstrap.
//!
//! Structural defects (unknown dependency, cycle) abort before any module
//! runs. After that, each module's failure is contained: it is recorded,
//! its dependents are marked blocked, and unrelated modules keep going.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use atelier_config::{BootstrapConcurrency, BootstrapConfig};
use atelier_core::{AtelierError, DiagnosticKind};
use futures::FutureExt;
use futures::future::join_all;

use crate::context::ModuleContext;
use crate::descriptor::FeatureModule;
use crate::registry::{ModuleRegistry, ModuleStatus};

/// How bootstrap runs module initializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Per-module soft timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub concurrency: BootstrapConcurrency,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self::from(&BootstrapConfig::default())
    }
}

impl From<&BootstrapConfig> for BootstrapOptions {
    fn from(config: &BootstrapConfig) -> Self {
        Self {
            timeout: config.module_timeout(),
            concurrency: config.concurrency,
        }
    }
}

/// Result of one module's bootstrap step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub id: String,
    pub status: ModuleStatus,
    pub elapsed: Duration,
}

/// Summary of a completed bootstrap.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    /// The resolved initialization order.
    pub order: Vec<String>,
    /// Outcomes in the order modules finished.
    pub outcomes: Vec<ModuleOutcome>,
    pub elapsed: Duration,
}

impl BootstrapReport {
    pub fn status(&self, id: &str) -> Option<&ModuleStatus> {
        self.outcomes.iter().find(|o| o.id == id).map(|o| &o.status)
    }

    fn ids_where(&self, predicate: impl Fn(&ModuleStatus) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| predicate(&o.status))
            .map(|o| o.id.as_str())
            .collect()
    }

    pub fn initialized(&self) -> Vec<&str> {
        self.ids_where(ModuleStatus::is_initialized)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.ids_where(|s| matches!(s, ModuleStatus::Failed { .. }))
    }

    pub fn blocked(&self) -> Vec<&str> {
        self.ids_where(|s| matches!(s, ModuleStatus::Blocked { .. }))
    }

    /// True when every module initialized.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_initialized())
    }
}

impl ModuleRegistry {
    /// Initialize every module in dependency order.
    ///
    /// Returns an error only for structural defects or a repeated call;
    /// module failures are reported through the returned [`BootstrapReport`].
    pub async fn bootstrap(
        &mut self,
        ctx: &ModuleContext,
        options: BootstrapOptions,
    ) -> Result<BootstrapReport, AtelierError> {
        if self.bootstrapped {
            return Err(AtelierError::AlreadyBootstrapped);
        }
        let order = self.resolve_order()?;
        self.bootstrapped = true;

        tracing::info!(
            modules = order.len(),
            concurrency = ?options.concurrency,
            timeout_ms = options.timeout.map(|t| t.as_millis() as u64),
            "bootstrapping modules"
        );

        let started = Instant::now();
        let outcomes = match options.concurrency {
            BootstrapConcurrency::Sequential => self.run_sequential(&order, ctx, options).await,
            BootstrapConcurrency::Waves => self.run_waves(&order, ctx, options).await,
        };

        let report = BootstrapReport {
            order,
            outcomes,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            initialized = report.initialized().len(),
            failed = report.failed().len(),
            blocked = report.blocked().len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "[ModuleRegistry] Bootstrap complete"
        );
        Ok(report)
    }

    async fn run_sequential(
        &mut self,
        order: &[String],
        ctx: &ModuleContext,
        options: BootstrapOptions,
    ) -> Vec<ModuleOutcome> {
        let mut outcomes = Vec::with_capacity(order.len());
        for id in order {
            let Some(module) = self.get(id) else {
                continue;
            };
            let outcome = match self.blocker_of(module.as_ref()) {
                Some(blocked_by) => blocked(id, blocked_by),
                None => run_one(module, ctx, options.timeout).await,
            };
            self.record(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Run modules grouped by dependency depth; each group runs concurrently.
    async fn run_waves(
        &mut self,
        order: &[String],
        ctx: &ModuleContext,
        options: BootstrapOptions,
    ) -> Vec<ModuleOutcome> {
        let mut outcomes = Vec::with_capacity(order.len());
        for wave in self.waves(order) {
            let mut runnable = Vec::new();
            for module in wave {
                match self.blocker_of(module.as_ref()) {
                    Some(blocked_by) => {
                        let outcome = blocked(module.id(), blocked_by);
                        self.record(&outcome);
                        outcomes.push(outcome);
                    }
                    None => runnable.push(module),
                }
            }

            let finished =
                join_all(runnable.into_iter().map(|m| run_one(m, ctx, options.timeout))).await;
            for outcome in finished {
                self.record(&outcome);
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Split `order` into groups by longest dependency chain, keeping order within a group.
    fn waves(&self, order: &[String]) -> Vec<Vec<Arc<dyn FeatureModule>>> {
        let mut depth: HashMap<&str, usize> = HashMap::new();
        let mut waves: Vec<Vec<Arc<dyn FeatureModule>>> = Vec::new();
        for id in order {
            let Some(module) = self.get(id) else {
                continue;
            };
            let level = module
                .descriptor()
                .depends_on
                .iter()
                .filter_map(|dep| depth.get(dep.as_str()))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(id.as_str(), level);
            if waves.len() <= level {
                waves.resize_with(level + 1, Vec::new);
            }
            waves[level].push(module);
        }
        waves
    }

    /// The first dependency that did not initialize, if any.
    fn blocker_of(&self, module: &dyn FeatureModule) -> Option<String> {
        module
            .descriptor()
            .depends_on
            .iter()
            .find(|dep| !self.statuses.get(dep.as_str()).is_some_and(ModuleStatus::is_initialized))
            .cloned()
    }

    fn record(&mut self, outcome: &ModuleOutcome) {
        let id = outcome.id.clone();
        match &outcome.status {
            ModuleStatus::Initialized => self.diagnostics.info(
                DiagnosticKind::ModuleInitialized { module: id.clone() },
                format!(
                    "[ModuleRegistry] Module {id} initialized in {}ms",
                    outcome.elapsed.as_millis()
                ),
            ),
            ModuleStatus::Failed { reason } => self.diagnostics.error(
                DiagnosticKind::ModuleFailed {
                    module: id.clone(),
                    reason: reason.clone(),
                },
                format!("[ModuleRegistry] Module {id} failed to initialize: {reason}"),
            ),
            ModuleStatus::Blocked { blocked_by } => self.diagnostics.warn(
                DiagnosticKind::ModuleBlocked {
                    module: id.clone(),
                    blocked_by: blocked_by.clone(),
                },
                format!("[ModuleRegistry] Module {id} skipped, dependency {blocked_by} did not initialize"),
            ),
            ModuleStatus::Pending => {}
        }
        self.statuses.insert(id, outcome.status.clone());
    }
}

fn blocked(id: &str, blocked_by: String) -> ModuleOutcome {
    ModuleOutcome {
        id: id.to_string(),
        status: ModuleStatus::Blocked { blocked_by },
        elapsed: Duration::ZERO,
    }
}

/// Await one module's `initialize()`, converting errors, panics, and timeouts into a status.
async fn run_one(
    module: Arc<dyn FeatureModule>,
    ctx: &ModuleContext,
    timeout: Option<Duration>,
) -> ModuleOutcome {
    let started = Instant::now();
    let init = AssertUnwindSafe(module.initialize(ctx)).catch_unwind();
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, init).await {
            Ok(result) => result,
            Err(_) => Ok(Err(AtelierError::Timeout { duration: limit })),
        },
        None => init.await,
    };

    let status = match result {
        Ok(Ok(())) => ModuleStatus::Initialized,
        Ok(Err(AtelierError::ModuleInitialization { message, .. })) => {
            ModuleStatus::Failed { reason: message }
        }
        Ok(Err(err)) => ModuleStatus::Failed {
            reason: err.to_string(),
        },
        Err(panic) => ModuleStatus::Failed {
            reason: format!("panicked: {}", panic_message(panic.as_ref())),
        },
    };
    ModuleOutcome {
        id: module.id().to_string(),
        status,
        elapsed: started.elapsed(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleDescriptor;
    use async_trait::async_trait;
    use atelier_core::Diagnostics;
    use std::sync::Mutex;

    /// Records initialization order into a shared log.
    struct Logged {
        descriptor: ModuleDescriptor,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl FeatureModule for Logged {
        fn descriptor(&self) -> &ModuleDescriptor {
            &self.descriptor
        }

        async fn initialize(&self, _ctx: &ModuleContext) -> Result<(), AtelierError> {
            self.log.lock().unwrap().push(self.descriptor.id.clone());
            if self.fail {
                return Err(AtelierError::Internal("boom".into()));
            }
            Ok(())
        }
    }

    fn setup(specs: &[(&str, &[&str], bool)]) -> (ModuleRegistry, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::default();
        for (id, deps, fail) in specs {
            registry
                .register_module(Arc::new(Logged {
                    descriptor: ModuleDescriptor::new(*id, *id).depends_on(deps.iter().copied()),
                    log: log.clone(),
                    fail: *fail,
                }))
                .unwrap();
        }
        (registry, log)
    }

    #[tokio::test]
    async fn initializes_in_resolved_order() {
        let (mut registry, log) = setup(&[("b", &["a"], false), ("a", &[], false)]);
        let report = registry
            .bootstrap(&ModuleContext::default(), BootstrapOptions::default())
            .await
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
        assert!(report.is_clean());
        assert_eq!(registry.initialized(), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn failure_blocks_dependents_only() {
        let (diagnostics, memory) = Diagnostics::recording();
        let (mut registry, log) = setup(&[
            ("broken", &[], true),
            ("sibling", &[], false),
            ("child", &["broken"], false),
            ("grandchild", &["child"], false),
        ]);
        registry.diagnostics = diagnostics;

        let report = registry
            .bootstrap(&ModuleContext::default(), BootstrapOptions::default())
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["broken", "sibling"]);
        assert_eq!(report.failed(), vec!["broken"]);
        assert_eq!(report.blocked(), vec!["child", "grandchild"]);
        assert_eq!(
            registry.status("grandchild"),
            Some(ModuleStatus::Blocked {
                blocked_by: "child".into()
            })
        );
        assert_eq!(
            memory.count(|k| matches!(k, DiagnosticKind::ModuleFailed { module, .. } if module == "broken")),
            1
        );
    }

    #[tokio::test]
    async fn second_bootstrap_is_rejected() {
        let (mut registry, log) = setup(&[("a", &[], false)]);
        let ctx = ModuleContext::default();
        registry.bootstrap(&ctx, BootstrapOptions::default()).await.unwrap();
        let err = registry.bootstrap(&ctx, BootstrapOptions::default()).await.unwrap_err();
        assert!(matches!(err, AtelierError::AlreadyBootstrapped));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn structural_error_runs_nothing() {
        let (mut registry, log) = setup(&[("a", &["b"], false), ("b", &["a"], false), ("c", &[], false)]);
        let err = registry
            .bootstrap(&ModuleContext::default(), BootstrapOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AtelierError::CyclicDependency { .. }));
        assert!(log.lock().unwrap().is_empty());
        assert!(!registry.is_bootstrapped());
    }

    #[tokio::test]
    async fn waves_group_by_depth() {
        let (mut registry, log) = setup(&[
            ("root", &[], false),
            ("left", &["root"], false),
            ("right", &["root"], false),
            ("leaf", &["left", "right"], false),
        ]);
        let options = BootstrapOptions {
            timeout: None,
            concurrency: BootstrapConcurrency::Waves,
        };
        let waves: Vec<Vec<String>> = registry
            .waves(&registry.resolve_order().unwrap())
            .iter()
            .map(|w| w.iter().map(|m| m.id().to_string()).collect())
            .collect();
        assert_eq!(waves, vec![vec!["root"], vec!["left", "right"], vec!["leaf"]]);

        let report = registry.bootstrap(&ModuleContext::default(), options).await.unwrap();
        assert!(report.is_clean());
        let log = log.lock().unwrap();
        assert_eq!(log.first().map(String::as_str), Some("root"));
        assert_eq!(log.last().map(String::as_str), Some("leaf"));
    }

    #[test]
    fn options_follow_config() {
        let config = BootstrapConfig {
            module_timeout_ms: 0,
            concurrency: BootstrapConcurrency::Waves,
        };
        let options = BootstrapOptions::from(&config);
        assert_eq!(options.timeout, None);
        assert_eq!(options.concurrency, BootstrapConcurrency::Waves);
    }
}
