//! Output formatting utilities

use console::style;
use serde::Serialize;
use serde_json::Value;
use std::io::IsTerminal;

use crate::cli::OutputFormat;
use crate::core::command::{CommandKind, ExecutionOutcome};
use crate::core::error::CliResult;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, to_terminal: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if to_terminal {
                OutputFormat::Human
            } else {
                OutputFormat::Json
            }
        }
        other => other,
    }
}

/// Effective format for the current stdout
pub fn stdout_format(format: OutputFormat) -> OutputFormat {
    effective_format(format, std::io::stdout().is_terminal())
}

/// Serialize `value` as JSON or YAML; `None` for human output
pub fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> CliResult<Option<String>> {
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yml::to_string(value)?.trim_end().to_string())),
        OutputFormat::Auto | OutputFormat::Human => Ok(None),
    }
}

/// Render an execution outcome
pub fn render_outcome(outcome: &ExecutionOutcome, format: OutputFormat, quiet: bool) -> CliResult<String> {
    if quiet {
        return Ok(match format {
            OutputFormat::Yaml => serde_yml::to_string(&outcome.result)?.trim_end().to_string(),
            _ => scalar(&outcome.result),
        });
    }

    if let Some(text) = serialize(outcome, format)? {
        return Ok(text);
    }

    let mut lines = Vec::new();
    let verb = match outcome.kind {
        CommandKind::Query => "queried",
        CommandKind::Transaction => "submitted",
    };
    lines.push(format!(
        "{} {} {} via {}",
        style("✓").green(),
        style(&outcome.command).cyan(),
        verb,
        outcome.backend
    ));

    for (key, value) in &outcome.params {
        lines.push(format!("  {:<12} {}", style(key).dim(), scalar(value)));
    }

    match &outcome.result {
        Value::Object(fields) => {
            for (key, value) in fields {
                lines.push(format!("{} {:<12} {}", style("→").blue(), key, scalar(value)));
            }
        }
        Value::Null => {}
        other => lines.push(format!("{} {}", style("→").blue(), scalar(other))),
    }

    lines.push(format!("  {:<12} {}", style("id").dim(), outcome.invocation_id));
    Ok(lines.join("\n"))
}

/// Compact text for a JSON value: strings unquoted, everything else as JSON
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
