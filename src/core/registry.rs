//! Command registry - top-level groups bound to command collections
//!
//! Built once per process and read-only afterwards. Construction fails fast
//! when the catalog violates an invariant, before any argument is parsed.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::catalog;
use crate::core::collection::CommandsCollection;
use crate::core::command::{Command, ContractCommand};
use crate::core::error::{CatalogError, ResolutionError};

/// A top-level CLI group (e.g. `token`) and the collections it exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandGroup {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub collections: &'static [&'static str],
}

impl CommandGroup {
    /// Exact match against the name or one of the aliases
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.contains(&token)
    }
}

#[derive(Debug)]
pub struct Registry<C> {
    groups: Vec<CommandGroup>,
    collections: Vec<CommandsCollection<C>>,
}

impl<C: Command> Registry<C> {
    /// Bind groups to collections, rejecting dangling or duplicate bindings
    pub fn new(
        groups: Vec<CommandGroup>,
        collections: Vec<CommandsCollection<C>>,
    ) -> Result<Self, CatalogError> {
        let mut names = HashSet::new();
        for collection in &collections {
            if !names.insert(collection.name()) {
                return Err(CatalogError::DuplicateCollection(collection.name().to_string()));
            }
        }

        for group in &groups {
            if let Some(missing) = group.collections.iter().find(|c| !names.contains(**c)) {
                return Err(CatalogError::UnboundCollection {
                    group: group.name.to_string(),
                    collection: missing.to_string(),
                });
            }
        }

        Ok(Self {
            groups,
            collections,
        })
    }

    /// Groups in declaration order
    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// Resolve a group by exact name or alias
    pub fn group(&self, token: &str) -> Result<&CommandGroup, ResolutionError> {
        self.groups
            .iter()
            .find(|g| g.matches(token))
            .ok_or_else(|| ResolutionError::UnknownGroup {
                token: token.to_string(),
                valid: self
                    .groups
                    .iter()
                    .flat_map(|g| std::iter::once(g.name).chain(g.aliases.iter().copied()))
                    .map(str::to_string)
                    .collect(),
            })
    }

    pub fn collections(&self) -> &[CommandsCollection<C>] {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Option<&CommandsCollection<C>> {
        self.collections.iter().find(|c| c.name() == name)
    }

    /// Collections bound to `group`, in binding order
    pub fn collections_of<'r>(
        &'r self,
        group: &'r CommandGroup,
    ) -> impl Iterator<Item = &'r CommandsCollection<C>> + 'r {
        group.collections.iter().filter_map(|name| self.collection(name))
    }
}

impl Registry<ContractCommand> {
    /// Registry built from the embedded catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(catalog::GROUPS.to_vec(), catalog::load_collections()?)
    }

    /// Process-wide registry, built on first use
    pub fn global() -> Result<&'static Self, CatalogError> {
        static REGISTRY: OnceLock<Registry<ContractCommand>> = OnceLock::new();
        if let Some(registry) = REGISTRY.get() {
            return Ok(registry);
        }
        let registry = Self::builtin()?;
        Ok(REGISTRY.get_or_init(|| registry))
    }
}
