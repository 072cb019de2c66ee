//! Built-in command catalog - embedded YAML manifests
//!
//! Each manifest under `catalog/` declares one collection. The files are
//! compiled into the binary and parsed once, when the registry is first used.

use rust_embed::Embed;
use serde::Deserialize;

use crate::core::collection::CommandsCollection;
use crate::core::command::ContractCommand;
use crate::core::error::CatalogError;
use crate::core::registry::CommandGroup;

#[derive(Embed)]
#[folder = "catalog/"]
struct EmbeddedCatalog;

/// Manifest files, in registry order
pub const MANIFESTS: &[&str] = &[
    "cat-20.yaml",
    "tokens-policy-registry.yaml",
    "tokens-generator.yaml",
];

/// Top-level CLI groups and the collections they expose
pub const GROUPS: &[CommandGroup] = &[
    CommandGroup {
        name: "tokensGenerator",
        aliases: &["TG"],
        description: "Tokens creation and deployment",
        collections: &["tokens-generator"],
    },
    CommandGroup {
        name: "token",
        aliases: &["T"],
        description: "Main functionality related with token",
        collections: &["CAT-20"],
    },
    CommandGroup {
        name: "symbolRegistry",
        aliases: &["SR", "tokensPolicyRegistry"],
        description: "Functions for interaction with symbol registry",
        collections: &["tokens-policy-registry"],
    },
];

/// On-disk shape of a collection manifest
#[derive(Debug, Deserialize)]
struct CollectionManifest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    commands: Vec<ContractCommand>,
}

/// Parse one manifest into a validated collection
pub fn parse_manifest(
    file: &str,
    content: &str,
) -> Result<CommandsCollection<ContractCommand>, CatalogError> {
    let manifest: CollectionManifest =
        serde_yml::from_str(content).map_err(|e| CatalogError::Manifest {
            file: file.to_string(),
            reason: e.to_string(),
        })?;
    CommandsCollection::new(manifest.name, manifest.description, manifest.commands)
}

/// Load every embedded collection
pub fn load_collections() -> Result<Vec<CommandsCollection<ContractCommand>>, CatalogError> {
    MANIFESTS
        .iter()
        .map(|file| {
            let embedded = EmbeddedCatalog::get(file).ok_or_else(|| CatalogError::Manifest {
                file: file.to_string(),
                reason: "not embedded in the binary".to_string(),
            })?;
            let content =
                std::str::from_utf8(&embedded.data).map_err(|e| CatalogError::Manifest {
                    file: file.to_string(),
                    reason: e.to_string(),
                })?;
            parse_manifest(file, content)
        })
        .collect()
}
