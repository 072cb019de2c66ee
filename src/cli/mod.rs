//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod help;
pub mod helpers;
pub mod output;

use clap::CommandFactory;
use tracing_subscriber::EnvFilter;

pub use args::{Cli, Commands, GlobalOpts, GroupArgs, OutputFormat};

use crate::core::command::ContractCommand;
use crate::core::error::{CliError, CliResult};
use crate::core::registry::Registry;

/// The clap command, with the root and each group's help extended by the catalog
pub fn command(registry: &Registry<ContractCommand>) -> clap::Command {
    let root = Cli::command().after_help(help::catalog_listing(registry));
    registry.groups().iter().fold(root, |cmd, group| {
        let listing = help::group_listing(registry, group);
        cmd.mut_subcommand(group.name, |sub| sub.after_help(listing))
    })
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `-v`
pub fn init_logging(global: &GlobalOpts) {
    let level = match (global.quiet, global.verbose) {
        (true, _) | (false, 0) => "off",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run one parsed invocation
pub fn run(cli: &Cli, registry: &Registry<ContractCommand>) -> CliResult<()> {
    match &cli.command {
        Commands::List(args) => commands::list::run(args, registry, &cli.global),
        Commands::Completions(args) => commands::completions::run(args, registry),
        Commands::Config(cmd) => commands::config::run(cmd, &cli.global),
        Commands::TokensGenerator(args) => {
            commands::group::run("tokensGenerator", args, registry, &cli.global)
        }
        Commands::Token(args) => commands::group::run("token", args, registry, &cli.global),
        Commands::SymbolRegistry(args) => {
            commands::group::run("symbolRegistry", args, registry, &cli.global)
        }
        Commands::Unknown(tokens) => {
            let token = tokens.first().map(String::as_str).unwrap_or_default();
            registry.group(token)?;
            Err(CliError::Usage(format!("'{}' is not a tfc command", token)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ResolutionError;
    use clap::Parser;

    #[test]
    fn test_group_help_lists_catalog_commands() {
        let registry = Registry::builtin().unwrap();
        let mut cmd = command(&registry);
        let sub = cmd.find_subcommand_mut("symbolRegistry").unwrap();
        let help = sub.render_long_help().to_string();
        assert!(help.contains("SetPolicyWithId"));
        assert!(help.contains("tfc symbolRegistry SetPolicy --token <address>"));
    }

    #[test]
    fn test_root_help_lists_every_group_catalog() {
        let registry = Registry::builtin().unwrap();
        let help = command(&registry).render_long_help().to_string();
        assert!(help.contains("Transfer"));
        assert!(help.contains("CreateToken"));
        assert!(help.contains("SetPolicyWithId"));
        assert!(help.contains("tfc symbolRegistry SetPolicy --token <address>"));
    }

    #[test]
    fn test_unknown_group_lists_every_group_and_alias() {
        let registry = Registry::builtin().unwrap();
        let cli = Cli::try_parse_from(["tfc", "tokenz", "Transfer"]).unwrap();
        let err = run(&cli, &registry).unwrap_err();
        assert_eq!(err.exit_code(), crate::core::error::EXIT_RESOLUTION);

        match err {
            CliError::Resolution(err @ ResolutionError::UnknownGroup { .. }) => {
                assert_eq!(err.token(), "tokenz");
                assert_eq!(
                    err.valid_options(),
                    ["tokensGenerator", "TG", "token", "T", "symbolRegistry", "SR", "tokensPolicyRegistry"]
                );
            }
            other => panic!("expected an unknown group error, got {:?}", other),
        }
    }

    #[test]
    fn test_group_alias_reaches_augmented_help() {
        let registry = Registry::builtin().unwrap();
        let cmd = command(&registry);
        let sub = cmd.find_subcommand("SR").unwrap();
        assert_eq!(sub.get_name(), "symbolRegistry");
    }
}
