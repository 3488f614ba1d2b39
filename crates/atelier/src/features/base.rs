// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Project, undo, and asset capabilities every other feature builds on.

use async_trait::async_trait;
use atelier_core::AtelierError;
use atelier_module::{FeatureModule, ModuleContext, ModuleDescriptor};
use atelier_plugin::Capability;
use serde_json::json;

pub const ID: &str = "core";

pub struct CoreModule {
    descriptor: ModuleDescriptor,
}

impl CoreModule {
    pub fn new() -> Self {
        Self {
            descriptor: ModuleDescriptor::new(ID, "Core").with_priority(100),
        }
    }
}

impl Default for CoreModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureModule for CoreModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), AtelierError> {
        ctx.capabilities.register(
            Capability::new("core.project", ID).with_metadata(json!({ "formats": ["atelier", "json"] })),
        );
        ctx.capabilities
            .register(Capability::new("core.undo", ID).with_metadata(json!({ "depth": 200 })));
        ctx.capabilities.register(Capability::new("core.assets", ID));
        Ok(())
    }
}
