// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted renderer component loaders.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use atelier_core::AtelierError;
use atelier_renderer::{ComponentHandle, ComponentLoader, RendererComponent};

/// A renderer component that only knows its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockComponent {
    name: String,
}

impl MockComponent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl RendererComponent for MockComponent {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for a [`ComponentLoader`] that counts its invocations.
#[derive(Debug, Clone)]
pub struct MockLoader {
    name: String,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

/// A loader resolving to a [`MockComponent`] called `name`.
pub fn mock_loader(name: &str) -> MockLoader {
    MockLoader {
        name: name.to_string(),
        failure: None,
        delay: None,
        calls: Arc::new(AtomicUsize::new(0)),
    }
}

impl MockLoader {
    /// Every load fails with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Each load sleeps on the tokio clock before settling.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Loads started so far, across every loader built from this mock.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn loader(&self) -> ComponentLoader {
        let name = self.name.clone();
        let failure = self.failure.clone();
        let delay = self.delay;
        let calls = self.calls.clone();
        ComponentLoader::new(move || {
            let name = name.clone();
            let failure = failure.clone();
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                match failure {
                    Some(message) => Err(AtelierError::Internal(message)),
                    None => Ok(Arc::new(MockComponent::new(&name)) as ComponentHandle),
                }
            }
        })
    }
}
