//! Core module - command model, registry and dispatch

pub mod collection;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod params;
pub mod registry;

pub use collection::CommandsCollection;
pub use command::{Command, CommandKind, ContractCommand, ExecutionContext, ExecutionOutcome};
pub use config::{BackendConfig, BackendKind, Config, Overrides};
pub use dispatch::{Dispatcher, InvocationRequest, Resolved, Target};
pub use error::{
    BackendError, CatalogError, CliError, CliResult, ConfigError, ResolutionError,
    ValidationError, ValidationErrorKind,
};
pub use params::{NormalizedParams, ParamSpec, ParamType};
pub use registry::{CommandGroup, Registry};
