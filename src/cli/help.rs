//! Help text built from the catalog
//!
//! Group help lists each command with its usage line; command help adds the
//! parameter table. Both are plain text so they can be attached to clap's
//! generated help.

use std::fmt::Write;

use crate::core::collection::CommandsCollection;
use crate::core::command::Command;
use crate::core::registry::{CommandGroup, Registry};

/// Command listing appended to a group's `--help`
pub fn group_listing<C: Command>(registry: &Registry<C>, group: &CommandGroup) -> String {
    let mut out = String::new();
    write_commands(&mut out, registry, group);
    out.push_str(&format!("Run 'tfc {} <COMMAND> --help' for parameter details.", group.name));
    out
}

/// Every group with its commands, appended to the top-level `--help`
pub fn catalog_listing<C: Command>(registry: &Registry<C>) -> String {
    let mut out = String::new();
    for group in registry.groups() {
        let mut names = vec![group.name];
        names.extend(group.aliases.iter().copied());
        let _ = writeln!(out, "{}: {}", names.join(", "), group.description);
        write_commands(&mut out, registry, group);
    }
    out.push_str("Run 'tfc <GROUP> <COMMAND> --help' for parameter details.");
    out
}

fn write_commands<C: Command>(out: &mut String, registry: &Registry<C>, group: &CommandGroup) {
    for collection in registry.collections_of(group) {
        let _ = writeln!(out, "Commands ({}):", collection.name());
        for command in collection.list() {
            let label = match command.alias() {
                Some(alias) if alias != command.name() => format!("{} ({})", command.name(), alias),
                _ => command.name().to_string(),
            };
            let _ = writeln!(out, "  {:<28} {}", label, command.description());
            let _ = writeln!(out, "      tfc {} {}", group.name, command.usage());
        }
        out.push('\n');
    }
}

/// Full help for one command
pub fn command_help<C: Command>(
    group: &CommandGroup,
    collection: &CommandsCollection<C>,
    command: &C,
) -> String {
    let mut out = String::new();
    match command.alias() {
        Some(alias) => {
            let _ = writeln!(out, "{} (alias: {})", command.name(), alias);
        }
        None => {
            let _ = writeln!(out, "{}", command.name());
        }
    }
    if !command.description().is_empty() {
        let _ = writeln!(out, "{}", command.description());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Collection: {}  Kind: {}", collection.name(), command.kind());
    let _ = writeln!(out, "Usage: tfc {} {}", group.name, command.usage());

    if command.params().is_empty() {
        let _ = write!(out, "\nThis command takes no parameters.");
        return out;
    }

    let _ = writeln!(out, "\nParameters:");
    for param in command.params() {
        let flag = format!("--{} <{}>", param.flag(), param.ty);
        let mut line = format!(
            "  {:<28} {:<9} {}",
            flag,
            if param.required { "required" } else { "optional" },
            param.description
        );
        if let Some(default) = &param.default {
            let _ = write!(line, " [default: {}]", default);
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::ContractCommand;

    #[test]
    fn test_group_listing_includes_usage_lines() {
        let registry = Registry::builtin().unwrap();
        let group = registry.group("symbolRegistry").unwrap();
        let listing = group_listing(&registry, group);

        assert!(listing.contains("SetPolicy (sp)"));
        assert!(listing.contains("tfc symbolRegistry GetPolicy --token <address> --action <bytes32>"));
        let set = listing.find("SetPolicy (sp)").unwrap();
        let get = listing.find("GetPolicy (gp)").unwrap();
        assert!(set < get);
    }

    #[test]
    fn test_catalog_listing_covers_every_group() {
        let registry = Registry::builtin().unwrap();
        let listing = catalog_listing(&registry);

        assert!(listing.contains("symbolRegistry, SR, tokensPolicyRegistry: Functions for interaction"));
        assert!(listing.contains("tfc tokensGenerator CreateToken --name <string> --symbol <string>"));
        assert!(listing.contains("CancelEscrow"));
        assert!(listing.contains("SetPolicyWithId"));
        let generator = listing.find("tokensGenerator, TG").unwrap();
        let registry_group = listing.find("symbolRegistry, SR").unwrap();
        assert!(generator < registry_group);
    }

    #[test]
    fn test_command_help() {
        let registry = Registry::builtin().unwrap();
        let group = registry.group("token").unwrap();
        let collection = registry.collection("CAT-20").unwrap();
        let transfer: &ContractCommand = collection.find_by_name("Transfer").unwrap();

        insta::assert_snapshot!(command_help(group, collection, transfer), @r"
        Transfer (alias: tr)
        Transfer tokens from the sender to a recipient

        Collection: CAT-20  Kind: transaction
        Usage: tfc token Transfer --to <address> --amount <uint>

        Parameters:
          --to <address>               required  Recipient address
          --amount <uint>              required  Amount in the token's base units
        ");
    }

    #[test]
    fn test_command_help_without_params() {
        let registry = Registry::builtin().unwrap();
        let group = registry.group("T").unwrap();
        let collection = registry.collection("CAT-20").unwrap();
        let pause = collection.find_by_name("Pause").unwrap();

        let help = command_help(group, collection, pause);
        assert!(help.contains("Usage: tfc token Pause"));
        assert!(help.ends_with("This command takes no parameters."));
    }

    #[test]
    fn test_defaults_are_shown() {
        let registry = Registry::builtin().unwrap();
        let group = registry.group("TG").unwrap();
        let collection = registry.collection("tokens-generator").unwrap();
        let create = collection.find_by_name("CreateToken").unwrap();

        assert!(command_help(group, collection, create).contains("[default: 18]"));
    }
}
