//! Error taxonomy for catalog construction, resolution, validation and execution
//!
//! Every error reaching `main` is a [`CliError`]. Each variant maps to a
//! distinct process exit code so scripts can tell a typo from a rejected
//! transaction.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::params::ParamType;

/// Exit code for a successful invocation
pub const EXIT_OK: u8 = 0;
/// Exit code for configuration, IO and catalog failures
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for invalid or missing command parameters
pub const EXIT_VALIDATION: u8 = 2;
/// Exit code for an unknown group or command token
pub const EXIT_RESOLUTION: u8 = 3;
/// Exit code for a failure reported by the execution backend
pub const EXIT_BACKEND: u8 = 4;
/// Exit code for a declared command without an execution path
pub const EXIT_NOT_IMPLEMENTED: u8 = 5;

/// Top-level error type surfaced to the CLI entry point
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Backend(#[from] BackendError),

    #[error("{collection}/{command} is declared but has no execution path")]
    #[diagnostic(
        code(tfc::not_implemented),
        help("the catalog entry is missing a backend target; this is a defect in the catalog")
    )]
    NotImplemented { collection: String, command: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    #[diagnostic(code(tfc::usage))]
    Usage(String),

    #[error("Global option '{flag}' given after the arguments of {command}")]
    #[diagnostic(
        code(tfc::usage),
        help("global options go before the group, e.g. tfc {flag} {group} {command} ...; everything after the command name is passed to the command")
    )]
    MisplacedGlobal {
        flag: String,
        group: String,
        command: String,
    },

    #[error("I/O error: {0}")]
    #[diagnostic(code(tfc::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(tfc::serialize))]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(tfc::serialize))]
    Yaml(#[from] serde_yml::Error),

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(tfc::prompt))]
    Prompt(#[from] dialoguer::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Validation(_) => EXIT_VALIDATION,
            CliError::Resolution(_) => EXIT_RESOLUTION,
            CliError::Backend(_) => EXIT_BACKEND,
            CliError::NotImplemented { .. } => EXIT_NOT_IMPLEMENTED,
            CliError::Usage(_) | CliError::MisplacedGlobal { .. } => EXIT_VALIDATION,
            CliError::Catalog(_)
            | CliError::Config(_)
            | CliError::Io(_)
            | CliError::Json(_)
            | CliError::Yaml(_)
            | CliError::Prompt(_) => EXIT_FAILURE,
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

// =========================================================================
// Validation
// =========================================================================

/// A command's raw arguments did not match its parameter schema
///
/// Raised before the backend is contacted.
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid arguments for {command}: {kind}")]
#[diagnostic(code(tfc::validation), help("usage: {usage}"))]
pub struct ValidationError {
    pub command: String,
    pub kind: ValidationErrorKind,
    pub usage: String,
}

impl ValidationError {
    /// Name of the offending parameter, when the failure is tied to one
    pub fn param(&self) -> Option<&str> {
        match &self.kind {
            ValidationErrorKind::MissingParameter { param, .. }
            | ValidationErrorKind::InvalidValue { param, .. }
            | ValidationErrorKind::MissingValue { param, .. }
            | ValidationErrorKind::DuplicateParameter { param } => Some(param),
            ValidationErrorKind::UnknownFlag { .. }
            | ValidationErrorKind::UnexpectedArgument { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("missing required parameter '{param}' (expected {expected})")]
    MissingParameter { param: String, expected: ParamType },

    #[error("invalid value '{value}' for '{param}' (expected {expected})")]
    InvalidValue {
        param: String,
        expected: ParamType,
        value: String,
    },

    #[error("flag '--{param}' needs a value (expected {expected})")]
    MissingValue { param: String, expected: ParamType },

    #[error("parameter '{param}' given more than once")]
    DuplicateParameter { param: String },

    #[error("unknown flag '{flag}'")]
    UnknownFlag { flag: String },

    #[error("unexpected argument '{value}'")]
    UnexpectedArgument { value: String },
}

// =========================================================================
// Resolution
// =========================================================================

/// A group or command token did not name anything in the registry
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Unknown command '{token}' for group '{group}'")]
    UnknownCommand {
        group: String,
        token: String,
        valid: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("Unknown group '{token}'")]
    UnknownGroup { token: String, valid: Vec<String> },
}

impl Diagnostic for ResolutionError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new("tfc::resolution"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let suggestion = match self {
            ResolutionError::UnknownCommand { suggestion, .. } => suggestion.as_deref(),
            ResolutionError::UnknownGroup { .. } => None,
        };
        Some(Box::new(options_help(self.valid_options(), suggestion)))
    }
}

impl ResolutionError {
    /// The token that failed to resolve
    pub fn token(&self) -> &str {
        match self {
            ResolutionError::UnknownCommand { token, .. }
            | ResolutionError::UnknownGroup { token, .. } => token,
        }
    }

    /// Every name and alias that would have resolved
    pub fn valid_options(&self) -> &[String] {
        match self {
            ResolutionError::UnknownCommand { valid, .. }
            | ResolutionError::UnknownGroup { valid, .. } => valid,
        }
    }
}

fn options_help(valid: &[String], suggestion: Option<&str>) -> String {
    let mut help = format!("valid options: {}", valid.join(", "));
    if let Some(suggestion) = suggestion {
        help.push_str(&format!("\ndid you mean '{}'?", suggestion));
    }
    help
}

// =========================================================================
// Backend
// =========================================================================

/// A failure reported by (or while talking to) the execution backend
///
/// Code and message are kept verbatim so backend diagnostics reach the user.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
#[error("Backend rejected {method}: [{code}] {message}")]
#[diagnostic(code(tfc::backend))]
pub struct BackendError {
    pub method: String,
    pub code: String,
    pub message: String,
}

impl BackendError {
    pub fn new(method: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

// =========================================================================
// Catalog & configuration
// =========================================================================

/// The command catalog violates its construction invariants
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("Collection '{collection}' declares command name '{name}' more than once")]
    #[diagnostic(code(tfc::catalog))]
    DuplicateName { collection: String, name: String },

    #[error("Collection '{collection}': alias '{alias}' of {command} is already taken by {taken_by}")]
    #[diagnostic(code(tfc::catalog))]
    DuplicateAlias {
        collection: String,
        alias: String,
        command: String,
        taken_by: String,
    },

    #[error("Collection '{collection}' contains a command with an empty name")]
    #[diagnostic(code(tfc::catalog))]
    EmptyName { collection: String },

    #[error("Group '{group}' is bound to unknown collection '{collection}'")]
    #[diagnostic(code(tfc::catalog))]
    UnboundCollection { group: String, collection: String },

    #[error("Collection name '{0}' is declared more than once")]
    #[diagnostic(code(tfc::catalog))]
    DuplicateCollection(String),

    #[error("Failed to parse catalog manifest {file}: {reason}")]
    #[diagnostic(code(tfc::catalog))]
    Manifest { file: String, reason: String },
}

/// Configuration could not be loaded
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    #[diagnostic(code(tfc::config), help("pass an existing file with --config or unset TFC_CONFIG"))]
    NotFound(String),

    #[error("Failed to read config {path}: {reason}")]
    #[diagnostic(code(tfc::config))]
    Read { path: String, reason: String },

    #[error("Invalid config {path}: {reason}")]
    #[diagnostic(code(tfc::config))]
    Invalid { path: String, reason: String },

    #[error("Backend 'exec' needs a program; set backend.program in the config file")]
    #[diagnostic(code(tfc::config))]
    MissingProgram,
}
