//! `tfc config` command - inspect the effective configuration

use clap::Subcommand;
use console::style;

use crate::cli::helpers::load_config;
use crate::cli::{output, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::error::CliResult;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration after command-line overrides
    Show,

    /// Print the path of the configuration file in use
    Path,
}

pub fn run(cmd: &ConfigCommands, global: &GlobalOpts) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(global),
    }
}

fn run_show(global: &GlobalOpts) -> CliResult<()> {
    let config = load_config(global)?;
    let format = match global.format {
        OutputFormat::Auto | OutputFormat::Human => OutputFormat::Yaml,
        other => other,
    };
    if let Some(text) = output::serialize(&config, format)? {
        println!("{}", text);
    }
    Ok(())
}

fn run_path(global: &GlobalOpts) -> CliResult<()> {
    let path = global.config.clone().or_else(Config::default_path);
    match path {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() && !global.quiet {
                eprintln!("{} file does not exist; built-in defaults apply", style("!").yellow());
            }
        }
        None => eprintln!("{} no configuration directory on this platform", style("✗").red()),
    }
    Ok(())
}
