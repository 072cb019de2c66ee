//! Command capability and the data-driven contract command

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

use crate::backend::{Backend, BackendCall, CallContext};
use crate::core::error::{CliError, CliResult, ValidationError};
use crate::core::params::{self, NormalizedParams, ParamSpec};

/// Whether a command reads contract state or submits a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Query,
    #[default]
    Transaction,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Query => write!(f, "query"),
            CommandKind::Transaction => write!(f, "transaction"),
        }
    }
}

/// Everything a command needs from its surroundings to run
pub struct ExecutionContext<'a> {
    pub backend: &'a dyn Backend,
    /// Top-level group the command was invoked through
    pub group: &'a str,
    /// Collection the command belongs to
    pub collection: &'a str,
    pub call: CallContext,
}

/// Result of a successful command execution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub invocation_id: Ulid,
    pub group: String,
    pub collection: String,
    pub command: String,
    pub method: String,
    pub kind: CommandKind,
    pub params: NormalizedParams,
    pub backend: String,
    pub result: Value,
    pub completed_at: DateTime<Utc>,
}

/// The capability every catalog entry provides
pub trait Command {
    /// Name, unique within the collection
    fn name(&self) -> &str;

    /// Optional short alias, unique within the collection
    fn alias(&self) -> Option<&str>;

    fn description(&self) -> &str;

    /// Ordered parameter schema
    fn params(&self) -> &[ParamSpec];

    fn kind(&self) -> CommandKind;

    /// Validate `args` against the schema, then invoke the backend once
    fn execute(&self, args: &[String], ctx: &ExecutionContext<'_>) -> CliResult<ExecutionOutcome>;

    /// One-line usage, e.g. `Transfer --to <address> --amount <uint>`
    fn usage(&self) -> String {
        std::iter::once(self.name().to_string())
            .chain(self.params().iter().map(ParamSpec::usage))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Bind raw arguments, wrapping failures with this command's usage
    fn bind(&self, args: &[String]) -> Result<NormalizedParams, ValidationError> {
        params::bind(self.params(), args).map_err(|kind| ValidationError {
            command: self.name().to_string(),
            kind,
            usage: self.usage(),
        })
    }
}

/// A contract operation declared in the catalog
///
/// All contract commands share one control flow; they differ only in data
/// (name, schema, backend target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCommand {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub kind: CommandKind,

    /// Backend method; a command without one cannot execute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

impl ContractCommand {
    pub fn new(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            description: String::new(),
            kind: CommandKind::Transaction,
            target: Some(target.to_string()),
            params: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn with_kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }
}

impl Command for ContractCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn kind(&self) -> CommandKind {
        self.kind
    }

    fn execute(&self, args: &[String], ctx: &ExecutionContext<'_>) -> CliResult<ExecutionOutcome> {
        let params = self.bind(args)?;
        tracing::debug!(command = %self.name, ?params, "parameters validated");

        let method = self.target.clone().ok_or_else(|| CliError::NotImplemented {
            collection: ctx.collection.to_string(),
            command: self.name.clone(),
        })?;

        let call = BackendCall {
            id: Ulid::new(),
            collection: ctx.collection.to_string(),
            command: self.name.clone(),
            method,
            kind: self.kind,
            params,
            context: ctx.call.clone(),
        };

        tracing::info!(id = %call.id, method = %call.method, backend = ctx.backend.name(), "calling backend");
        let result = ctx.backend.call(&call)?;

        Ok(ExecutionOutcome {
            invocation_id: call.id,
            group: ctx.group.to_string(),
            collection: call.collection,
            command: call.command,
            method: call.method,
            kind: call.kind,
            params: call.params,
            backend: ctx.backend.name().to_string(),
            result,
            completed_at: Utc::now(),
        })
    }
}
