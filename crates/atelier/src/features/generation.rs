// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation providers and their UI extensions.

use async_trait::async_trait;
use atelier_core::{AtelierError, GenerationUiExtension, PluginDefinition, PluginPayload};
use atelier_module::{DevToolDescriptor, FeatureModule, ModuleContext, ModuleDescriptor, PageDescriptor};
use atelier_plugin::Capability;

pub const ID: &str = "generation-ui";

pub struct GenerationUiModule {
    descriptor: ModuleDescriptor,
}

impl GenerationUiModule {
    pub fn new() -> Self {
        let page = PageDescriptor {
            feature_id: Some("generation".to_string()),
            route: Some("/generation".to_string()),
            icon: Some("sparkles".to_string()),
            category: Some("generation".to_string()),
            component: Some("GenerationPage".to_string()),
            actions: Vec::new(),
            dev_tool: Some(DevToolDescriptor {
                label: Some("Generation Queue".to_string()),
                panel_component: Some("GenerationQueuePanel".to_string()),
                tags: vec!["generation".to_string(), "queue".to_string()],
                ..DevToolDescriptor::default()
            }),
        };
        Self {
            descriptor: ModuleDescriptor::new(ID, "Generation")
                .depends_on([super::base::ID, super::graph::ID])
                .with_page(page),
        }
    }
}

impl Default for GenerationUiModule {
    fn default() -> Self {
        Self::new()
    }
}

fn extension(id: &str, provider: &str, label: &str, panel: &str, operations: &[&str]) -> PluginDefinition {
    PluginDefinition::builtin(
        id,
        PluginPayload::GenerationUi(GenerationUiExtension {
            id: id.to_string(),
            provider: provider.to_string(),
            label: label.to_string(),
            panel_component: Some(panel.to_string()),
            operations: operations.iter().map(|o| o.to_string()).collect(),
        }),
    )
}

#[async_trait]
impl FeatureModule for GenerationUiModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, ctx: &ModuleContext) -> Result<(), AtelierError> {
        ctx.catalog.register(extension(
            "image-prompt",
            "image",
            "Image Prompt",
            "ImagePromptPanel",
            &["generate", "variations"],
        ));
        ctx.catalog.register(extension(
            "voice-casting",
            "voice",
            "Voice Casting",
            "VoiceCastingPanel",
            &["generate", "preview"],
        ));
        ctx.capabilities
            .register(Capability::new("generation.queue", "generation"));
        Ok(())
    }
}
