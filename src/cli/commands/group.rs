//! `tfc <group> [COMMAND] [ARGS...]` - resolve and run one catalog command

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::backend;
use crate::cli::args::{is_global_flag, GroupArgs};
use crate::cli::helpers::{is_interactive, load_config};
use crate::cli::{help, output, GlobalOpts};
use crate::core::command::{Command, ContractCommand};
use crate::core::dispatch::{Dispatcher, InvocationRequest, Target};
use crate::core::error::{CliError, CliResult};
use crate::core::params::ParamSpec;
use crate::core::registry::{CommandGroup, Registry};

pub fn run(
    group: &str,
    args: &GroupArgs,
    registry: &Registry<ContractCommand>,
    global: &GlobalOpts,
) -> CliResult<()> {
    let dispatcher = Dispatcher::new(registry);
    let group = registry.group(group)?;

    let request = match &args.command {
        Some(token) if args.wants_help() => {
            let resolved = dispatcher.resolve(group.name, token)?;
            println!("{}", help::command_help(group, resolved.collection, resolved.command));
            return Ok(());
        }
        Some(token) => InvocationRequest::new(group.name, token.clone(), args.args.clone()),
        None if args.interactive => prompt_request(group, registry)?,
        None => {
            print_group_help(registry, group)?;
            return Ok(());
        }
    };

    let config = load_config(global)?;
    let backend = backend::from_config(&config.backend)?;
    let outcome = dispatcher
        .dispatch(
            &request,
            &Target {
                backend: backend.as_ref(),
                config: &config,
                contract: global.contract.as_deref(),
            },
        )
        .map_err(|e| match e {
            CliError::Validation(_) => misplaced_global(&request).unwrap_or(e),
            e => e,
        })?;

    let format = output::stdout_format(global.format);
    println!("{}", output::render_outcome(&outcome, format, global.quiet)?);
    Ok(())
}

/// A global option among the command arguments, which clap left to the command
fn misplaced_global(request: &InvocationRequest) -> Option<CliError> {
    request
        .args
        .iter()
        .take_while(|a| a.as_str() != "--")
        .find(|a| is_global_flag(a))
        .map(|flag| CliError::MisplacedGlobal {
            flag: flag.clone(),
            group: request.group.clone(),
            command: request.command.clone(),
        })
}

fn print_group_help(registry: &Registry<ContractCommand>, group: &CommandGroup) -> CliResult<()> {
    let mut cmd = crate::cli::command(registry);
    cmd.build();
    match cmd.find_subcommand_mut(group.name) {
        Some(sub) => sub.print_long_help()?,
        None => println!("{}", help::group_listing(registry, group)),
    }
    Ok(())
}

/// Select a command and collect its parameters through terminal prompts
fn prompt_request(
    group: &CommandGroup,
    registry: &Registry<ContractCommand>,
) -> CliResult<InvocationRequest> {
    if !is_interactive() {
        return Err(CliError::Usage(
            "interactive mode needs a terminal; pass the command and its arguments instead".to_string(),
        ));
    }

    let theme = ColorfulTheme::default();
    let commands: Vec<&ContractCommand> = registry
        .collections_of(group)
        .flat_map(|c| c.list())
        .collect();
    let labels: Vec<String> = commands
        .iter()
        .map(|c| format!("{:<22} {}", c.name(), c.description()))
        .collect();

    let selection = Select::with_theme(&theme)
        .with_prompt(format!("{} command", group.name))
        .items(&labels)
        .default(0)
        .interact()?;
    let command = commands[selection];

    let mut args = Vec::new();
    for param in command.params() {
        let prompt = if param.required {
            format!("{} ({})", param.name, param.ty)
        } else {
            format!("{} ({}, optional)", param.name, param.ty)
        };
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(!param.required);
        if let Some(default) = &param.default {
            input = input.default(default.clone());
        }
        let value = input.interact_text()?;
        if !value.trim().is_empty() {
            args.push(prompted_arg(param, value.trim()));
        }
    }

    eprintln!(
        "{} tfc {} {} {}",
        style("→").blue(),
        group.name,
        command.name(),
        args.join(" ")
    );
    Ok(InvocationRequest::new(group.name, command.name(), args))
}

/// `--flag=value`, so a prompted value is never read back as a flag
fn prompted_arg(param: &ParamSpec, value: &str) -> String {
    format!("--{}={}", param.flag(), value)
}
