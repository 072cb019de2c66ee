//! Commands collection - an immutable, uniquely keyed group of commands

use std::collections::HashMap;

use crate::core::command::Command;
use crate::core::error::CatalogError;

/// Ordered group of related commands (e.g. every CAT-20 operation)
///
/// Names and aliases are unique within the collection; an alias may not
/// shadow another command's name either. Lookups never fall back to partial
/// or case-insensitive matches.
#[derive(Debug)]
pub struct CommandsCollection<C> {
    name: String,
    description: String,
    commands: Vec<C>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl<C: Command> CommandsCollection<C> {
    /// Build a collection, rejecting duplicate names and aliases
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        commands: Vec<C>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        let mut by_name = HashMap::new();
        let mut by_alias: HashMap<String, usize> = HashMap::new();

        for (index, command) in commands.iter().enumerate() {
            if command.name().trim().is_empty() {
                return Err(CatalogError::EmptyName { collection: name });
            }
            if by_name.insert(command.name().to_string(), index).is_some() {
                return Err(CatalogError::DuplicateName {
                    collection: name,
                    name: command.name().to_string(),
                });
            }
        }

        for (index, command) in commands.iter().enumerate() {
            let Some(alias) = command.alias() else {
                continue;
            };
            let taken_by = by_alias
                .get(alias)
                .or_else(|| by_name.get(alias).filter(|&&owner| owner != index))
                .map(|&owner| commands[owner].name().to_string());
            if let Some(taken_by) = taken_by {
                return Err(CatalogError::DuplicateAlias {
                    collection: name,
                    alias: alias.to_string(),
                    command: command.name().to_string(),
                    taken_by,
                });
            }
            by_alias.insert(alias.to_string(), index);
        }

        Ok(Self {
            name,
            description: description.into(),
            commands,
            by_name,
            by_alias,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn find_by_name(&self, name: &str) -> Option<&C> {
        self.by_name.get(name).map(|&i| &self.commands[i])
    }

    pub fn find_by_alias(&self, alias: &str) -> Option<&C> {
        self.by_alias.get(alias).map(|&i| &self.commands[i])
    }

    /// Exact name first, then exact alias
    pub fn find(&self, token: &str) -> Option<&C> {
        self.find_by_name(token).or_else(|| self.find_by_alias(token))
    }

    /// Commands in declaration order
    pub fn list(&self) -> impl Iterator<Item = &C> + '_ {
        self.commands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().map(|c| c.name())
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| c.alias())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
