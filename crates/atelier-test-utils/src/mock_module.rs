// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted feature module for bootstrap tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use atelier_core::AtelierError;
use atelier_module::{FeatureModule, ModuleContext, ModuleDescriptor, PageDescriptor};

/// Shared record of module ids in the order their `initialize()` began.
pub type InitLog = Arc<Mutex<Vec<String>>>;

type InitHook = Arc<dyn Fn(&ModuleContext) -> Result<(), AtelierError> + Send + Sync>;

#[derive(Clone)]
enum Behavior {
    Succeed,
    Fail(String),
    Hang,
    Panic(String),
}

/// A module whose `initialize()` does whatever the test asks.
///
/// Every call is counted, so tests can assert that a blocked module was
/// never initialized.
#[derive(Clone)]
pub struct MockModule {
    descriptor: ModuleDescriptor,
    behavior: Behavior,
    delay: Option<Duration>,
    hook: Option<InitHook>,
    log: Option<InitLog>,
    calls: Arc<AtomicUsize>,
}

impl MockModule {
    /// A module named after its id that initializes successfully.
    pub fn new(id: &str) -> Self {
        Self::from_descriptor(ModuleDescriptor::new(id, id))
    }

    pub fn from_descriptor(descriptor: ModuleDescriptor) -> Self {
        Self {
            descriptor,
            behavior: Behavior::Succeed,
            delay: None,
            hook: None,
            log: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.descriptor.name = name.to_string();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.descriptor.priority = Some(priority);
        self
    }

    pub fn depends_on(mut self, ids: &[&str]) -> Self {
        self.descriptor = self.descriptor.depends_on(ids.iter().copied());
        self
    }

    pub fn with_page(mut self, page: PageDescriptor) -> Self {
        self.descriptor.page = Some(page);
        self
    }

    /// `initialize()` returns an error with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.behavior = Behavior::Fail(message.to_string());
        self
    }

    /// `initialize()` never completes.
    pub fn hanging(mut self) -> Self {
        self.behavior = Behavior::Hang;
        self
    }

    /// `initialize()` panics with `message`.
    pub fn panicking(mut self, message: &str) -> Self {
        self.behavior = Behavior::Panic(message.to_string());
        self
    }

    /// Sleep on the tokio clock before doing anything else.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Run `hook` against the context on a successful `initialize()`.
    pub fn on_initialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ModuleContext) -> Result<(), AtelierError> + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Append this module's id to `log` when `initialize()` starts.
    pub fn logging_into(mut self, log: &InitLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Number of times `initialize()` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wrap in an `Arc` for registration, keeping a handle for assertions.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl FeatureModule for MockModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), AtelierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(self.descriptor.id.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Succeed => match &self.hook {
                Some(hook) => hook(ctx),
                None => Ok(()),
            },
            Behavior::Fail(message) => Err(AtelierError::ModuleInitialization {
                module: self.descriptor.id.clone(),
                message: message.clone(),
            }),
            Behavior::Hang => futures::future::pending().await,
            Behavior::Panic(message) => panic!("{message}"),
        }
    }
}
