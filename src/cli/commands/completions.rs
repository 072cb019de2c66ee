//! `tfc completions` command - shell completion scripts

use clap_complete::{generate, Shell};
use std::io;

use crate::core::command::ContractCommand;
use crate::core::error::CliResult;
use crate::core::registry::Registry;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: &CompletionsArgs, registry: &Registry<ContractCommand>) -> CliResult<()> {
    let mut cmd = crate::cli::command(registry);
    generate(args.shell, &mut cmd, "tfc", &mut io::stdout());
    Ok(())
}
