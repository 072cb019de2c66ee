//! Command-line surface

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::config::ConfigCommands;
use crate::cli::commands::list::ListArgs;
use crate::core::config::{BackendKind, Overrides};

#[derive(Parser, Debug)]
#[command(name = "tfc")]
#[command(version, about = "CLI for tokens factory and deployed tokens with other system components")]
#[command(arg_required_else_help = true, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(long, global = true, env = "TFC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Execution backend (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Contract address for this call (overrides the config file)
    #[arg(long, global = true)]
    pub contract: Option<String>,

    /// Sender account (overrides the config file)
    #[arg(long, global = true)]
    pub sender: Option<String>,

    /// Network name (overrides the config file)
    #[arg(long, global = true)]
    pub network: Option<String>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print only the result
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalOpts {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            network: self.network.clone(),
            sender: self.sender.clone(),
            backend: self.backend,
        }
    }
}

/// Whether `token` spells a global option (`--format`, `--format=json`, `-q`, `-vv`)
pub fn is_global_flag(token: &str) -> bool {
    let cmd = Cli::command();
    let mut globals = cmd.get_arguments().filter(|a| a.is_global_set());
    if let Some(long) = token.strip_prefix("--") {
        let name = long.split_once('=').map_or(long, |(name, _)| name);
        return !name.is_empty() && globals.any(|a| a.get_long() == Some(name));
    }
    match token.strip_prefix('-') {
        Some(shorts) if !shorts.is_empty() => {
            let globals: Vec<_> = globals.collect();
            shorts
                .chars()
                .all(|c| globals.iter().any(|a| a.get_short() == Some(c)))
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable on a terminal, JSON when piped
    #[default]
    Auto,
    Human,
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tokens creation and deployment
    #[command(name = "tokensGenerator", visible_alias = "TG", disable_help_flag = true)]
    TokensGenerator(GroupArgs),

    /// Main functionality related with token
    #[command(name = "token", visible_alias = "T", disable_help_flag = true)]
    Token(GroupArgs),

    /// Functions for interaction with symbol registry
    #[command(
        name = "symbolRegistry",
        visible_aliases = ["SR", "tokensPolicyRegistry"],
        disable_help_flag = true
    )]
    SymbolRegistry(GroupArgs),

    /// List groups and their commands
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Any other token, reported against the registry's groups
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

#[derive(clap::Args, Debug, Clone)]
pub struct GroupArgs {
    /// Command name or alias
    pub command: Option<String>,

    /// Command arguments (`--name value` or positional, in schema order)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Pick the command and enter its parameters through prompts
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Print help for the group, or for COMMAND when given
    #[arg(long, short = 'h')]
    pub help: bool,
}

impl GroupArgs {
    /// Help requested either before or among the command arguments
    pub fn wants_help(&self) -> bool {
        self.help
            || self
                .args
                .iter()
                .take_while(|a| a.as_str() != "--")
                .any(|a| a == "--help" || a == "-h")
    }
}
