//! `tfc list` command - catalog listing

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::truncate_str;
use crate::cli::{output, GlobalOpts, OutputFormat};
use crate::core::command::{Command, CommandKind, ContractCommand};
use crate::core::error::CliResult;
use crate::core::registry::Registry;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list this group (name or alias)
    pub group: Option<String>,
}

/// One catalog entry as listed
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct CommandRow {
    #[tabled(rename = "GROUP")]
    pub group: String,
    #[tabled(rename = "COMMAND")]
    pub command: String,
    #[tabled(rename = "ALIAS")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[tabled(rename = "KIND")]
    pub kind: CommandKind,
    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
    #[tabled(skip)]
    pub collection: String,
    #[tabled(skip)]
    pub usage: String,
}

/// Rows for every command, optionally restricted to one group
pub fn rows(registry: &Registry<ContractCommand>, group: Option<&str>) -> CliResult<Vec<CommandRow>> {
    let groups = match group {
        Some(token) => vec![registry.group(token)?],
        None => registry.groups().iter().collect(),
    };

    let mut rows = Vec::new();
    for group in groups {
        for collection in registry.collections_of(group) {
            for command in collection.list() {
                rows.push(CommandRow {
                    group: group.name.to_string(),
                    command: command.name().to_string(),
                    alias: command.alias().unwrap_or_default().to_string(),
                    kind: command.kind(),
                    description: command.description().to_string(),
                    collection: collection.name().to_string(),
                    usage: command.usage(),
                });
            }
        }
    }
    Ok(rows)
}

pub fn run(args: &ListArgs, registry: &Registry<ContractCommand>, global: &GlobalOpts) -> CliResult<()> {
    let rows = rows(registry, args.group.as_deref())?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Human,
        other => other,
    };
    if let Some(text) = output::serialize(&rows, format)? {
        println!("{}", text);
        return Ok(());
    }

    let display: Vec<CommandRow> = rows
        .into_iter()
        .map(|row| CommandRow {
            description: truncate_str(&row.description, 60),
            ..row
        })
        .collect();
    let mut table = Table::new(display);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}
