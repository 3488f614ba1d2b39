// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! World and game tooling: locations, characters, and world state.

use async_trait::async_trait;
use atelier_core::AtelierError;
use atelier_module::{
    ActionDescriptor, DevToolDescriptor, FeatureModule, ModuleContext, ModuleDescriptor,
    PageDescriptor,
};
use atelier_plugin::Capability;
use serde_json::json;

pub const ID: &str = "world";

pub struct WorldModule {
    descriptor: ModuleDescriptor,
}

impl WorldModule {
    pub fn new() -> Self {
        let page = PageDescriptor {
            feature_id: Some("world-state".to_string()),
            route: Some("/world".to_string()),
            icon: Some("globe".to_string()),
            category: Some("authoring".to_string()),
            component: Some("WorldPage".to_string()),
            actions: vec![
                ActionDescriptor::new("world.new-location", "New Location"),
                ActionDescriptor::new("world.new-character", "New Character"),
            ],
            dev_tool: Some(DevToolDescriptor {
                label: Some("World State".to_string()),
                description: Some("Live variables and flags of the running world".to_string()),
                panel_component: Some("WorldStatePanel".to_string()),
                route_path: Some("/dev/world".to_string()),
                category: Some("game".to_string()),
                tags: vec!["world".to_string(), "state".to_string()],
                ..DevToolDescriptor::default()
            }),
        };
        Self {
            descriptor: ModuleDescriptor::new(ID, "World")
                .with_priority(20)
                .depends_on([super::base::ID])
                .with_page(page),
        }
    }
}

impl Default for WorldModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureModule for WorldModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), AtelierError> {
        ctx.capabilities
            .register(Capability::new("world.locations", "world-state"));
        ctx.capabilities.register(
            Capability::new("world.characters", "world-state")
                .with_metadata(json!({ "relationships": true })),
        );
        ctx.capabilities
            .register(Capability::new("world.simulation", "world-state").disabled());
        Ok(())
    }
}
