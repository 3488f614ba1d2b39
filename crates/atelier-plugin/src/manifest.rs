// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User plugin manifests.
//!
//! A manifest is a TOML file with a `[plugin]` header and one payload
//! table matching its family. Only families that need no code can be
//! declared this way: dev tools and generation-provider UI extensions.
//!
//! ```toml
//! [plugin]
//! id = "prompt-lab"
//! family = "generation-ui"
//! min_atelier_version = "0.1.0"
//!
//! [generation_ui]
//! provider = "image"
//! label = "Prompt Lab"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use atelier_core::{
    AtelierError, DevToolDefinition, GenerationUiExtension, Origin, PluginDefinition,
    PluginFamily, PluginPayload, Source,
};
use serde::Deserialize;

/// Version manifests are checked against.
const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    plugin: PluginSection,
    #[serde(default)]
    dev_tool: Option<DevToolSection>,
    #[serde(default)]
    generation_ui: Option<GenerationUiSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    id: String,
    family: String,
    #[serde(default)]
    min_atelier_version: Option<String>,
    #[serde(default = "default_can_disable")]
    can_disable: bool,
}

fn default_can_disable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DevToolSection {
    label: String,
    description: Option<String>,
    icon: Option<String>,
    category: Option<String>,
    panel_component: Option<String>,
    route_path: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    safe_for_non_dev: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationUiSection {
    provider: String,
    label: String,
    panel_component: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

/// Parse a plugin manifest into a user-origin catalog definition.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginDefinition, AtelierError> {
    let file: ManifestFile =
        toml::from_str(toml_content).map_err(|e| AtelierError::Manifest(e.to_string()))?;
    let section = file.plugin;

    if section.id.trim().is_empty() {
        return Err(AtelierError::Manifest("id must not be empty".to_string()));
    }

    if let Some(required) = &section.min_atelier_version {
        check_version(required)?;
    }

    let family = PluginFamily::from_str(&section.family).map_err(|_| {
        AtelierError::Manifest(format!("unknown family `{}`", section.family))
    })?;

    let payload = match family {
        PluginFamily::DevTool => {
            let tool = file.dev_tool.ok_or_else(|| {
                AtelierError::Manifest("family `dev-tool` requires a [dev_tool] table".to_string())
            })?;
            let mut definition = DevToolDefinition::new(section.id.clone(), tool.label);
            definition.description = tool.description;
            definition.icon = tool.icon;
            if let Some(category) = tool.category {
                definition.category = category;
            }
            definition.panel_component = tool.panel_component;
            definition.route_path = tool.route_path;
            definition.tags = tool.tags;
            definition.safe_for_non_dev = tool.safe_for_non_dev;
            PluginPayload::DevTool(definition)
        }
        PluginFamily::GenerationUi => {
            let ext = file.generation_ui.ok_or_else(|| {
                AtelierError::Manifest(
                    "family `generation-ui` requires a [generation_ui] table".to_string(),
                )
            })?;
            PluginPayload::GenerationUi(GenerationUiExtension {
                id: section.id.clone(),
                provider: ext.provider,
                label: ext.label,
                panel_component: ext.panel_component,
                operations: ext.operations,
            })
        }
        PluginFamily::Renderer | PluginFamily::NodeType => {
            return Err(AtelierError::Manifest(format!(
                "family `{family}` cannot be declared in a manifest"
            )));
        }
    };

    Ok(PluginDefinition {
        id: section.id,
        origin: Origin::User,
        source: Source::Explicit,
        payload,
        can_disable: section.can_disable,
    })
}

fn check_version(required: &str) -> Result<(), AtelierError> {
    let required = semver::Version::parse(required).map_err(|e| {
        AtelierError::Manifest(format!("invalid min_atelier_version `{required}`: {e}"))
    })?;
    let current = semver::Version::parse(SHELL_VERSION)
        .map_err(|e| AtelierError::Internal(format!("invalid shell version: {e}")))?;
    if required > current {
        return Err(AtelierError::Manifest(format!(
            "requires atelier {required}, running {current}"
        )));
    }
    Ok(())
}

/// Result of scanning a manifest directory.
#[derive(Debug, Default)]
pub struct ManifestScan {
    pub definitions: Vec<PluginDefinition>,
    /// Files that could not be read or parsed.
    pub errors: Vec<(PathBuf, AtelierError)>,
}

/// Parse every `*.toml` file in `dir`, sorted by file name.
///
/// A bad manifest is reported in `errors` and does not stop the scan.
/// A missing directory yields an empty scan.
pub fn load_manifest_dir(dir: &Path) -> ManifestScan {
    let mut scan = ManifestScan::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "manifest directory does not exist");
            return scan;
        }
        Err(e) => {
            scan.errors.push((
                dir.to_path_buf(),
                AtelierError::Manifest(format!("cannot read directory: {e}")),
            ));
            return scan;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    for path in paths {
        let result = std::fs::read_to_string(&path)
            .map_err(|e| AtelierError::Manifest(format!("cannot read file: {e}")))
            .and_then(|content| parse_plugin_manifest(&content));
        match result {
            Ok(definition) => scan.definitions.push(definition),
            Err(e) => scan.errors.push((path, e)),
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dev_tool_manifest() {
        let toml = r#"
[plugin]
id = "frame-timer"
family = "dev-tool"
can_disable = false

[dev_tool]
label = "Frame Timer"
category = "performance"
route_path = "/dev/frame-timer"
tags = ["perf"]
safe_for_non_dev = true
"#;
        let def = parse_plugin_manifest(toml).unwrap();
        assert_eq!(def.id, "frame-timer");
        assert_eq!(def.origin, Origin::User);
        assert!(!def.can_disable);
        let tool = def.as_dev_tool().unwrap();
        assert_eq!(tool.category, "performance");
        assert!(tool.is_reachable());
        assert!(tool.safe_for_non_dev);
    }

    #[test]
    fn parse_generation_ui_manifest() {
        let toml = r#"
[plugin]
id = "prompt-lab"
family = "generation-ui"
min_atelier_version = "0.1.0"

[generation_ui]
provider = "image"
label = "Prompt Lab"
operations = ["txt2img", "img2img"]
"#;
        let def = parse_plugin_manifest(toml).unwrap();
        assert_eq!(def.family(), PluginFamily::GenerationUi);
        let ext = def.as_generation_ui().unwrap();
        assert_eq!(ext.provider, "image");
        assert_eq!(ext.operations.len(), 2);
    }

    #[test]
    fn rejects_missing_payload_table() {
        let toml = r#"
[plugin]
id = "x"
family = "dev-tool"
"#;
        let err = parse_plugin_manifest(toml).unwrap_err().to_string();
        assert!(err.contains("requires a [dev_tool] table"));
    }

    #[test]
    fn rejects_code_backed_families() {
        let toml = r#"
[plugin]
id = "video"
family = "renderer"
"#;
        let err = parse_plugin_manifest(toml).unwrap_err().to_string();
        assert!(err.contains("cannot be declared in a manifest"));
    }

    #[test]
    fn rejects_unknown_family_and_empty_id() {
        let unknown = "[plugin]\nid = \"x\"\nfamily = \"widget\"\n";
        assert!(
            parse_plugin_manifest(unknown)
                .unwrap_err()
                .to_string()
                .contains("unknown family")
        );

        let empty = "[plugin]\nid = \"\"\nfamily = \"dev-tool\"\n";
        assert!(
            parse_plugin_manifest(empty)
                .unwrap_err()
                .to_string()
                .contains("id must not be empty")
        );
    }

    #[test]
    fn rejects_future_version() {
        let toml = r#"
[plugin]
id = "x"
family = "dev-tool"
min_atelier_version = "99.0.0"

[dev_tool]
label = "X"
"#;
        let err = parse_plugin_manifest(toml).unwrap_err().to_string();
        assert!(err.contains("requires atelier 99.0.0"));
    }
}
