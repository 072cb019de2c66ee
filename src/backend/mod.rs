//! Execution backend - the contract layer commands delegate to
//!
//! The CLI never implements token semantics. A command builds a
//! [`BackendCall`] from its normalized parameters and hands it to a
//! [`Backend`], which either returns a result payload (receipt or queried
//! value) or a [`BackendError`] carrying the backend's own code and message.

pub mod dry_run;
pub mod exec;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

use crate::core::command::CommandKind;
use crate::core::config::{BackendConfig, BackendKind};
use crate::core::error::{BackendError, ConfigError};
use crate::core::params::NormalizedParams;

pub use dry_run::DryRunBackend;
pub use exec::ExecBackend;

/// The contract layer as seen from a command
///
/// Calls are synchronous from the caller's perspective; one call per
/// command invocation.
pub trait Backend {
    /// Short name shown in outcomes and logs
    fn name(&self) -> &'static str;

    /// Invoke a contract method with normalized parameters
    fn call(&self, call: &BackendCall) -> Result<Value, BackendError>;
}

/// Where and as whom a call is made
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// A single request to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCall {
    pub id: Ulid,
    pub collection: String,
    pub command: String,
    pub method: String,
    pub kind: CommandKind,
    pub params: NormalizedParams,
    pub context: CallContext,
}

/// Build the backend selected by configuration
pub fn from_config(config: &BackendConfig) -> Result<Box<dyn Backend>, ConfigError> {
    match config.kind {
        BackendKind::DryRun => Ok(Box::new(DryRunBackend)),
        BackendKind::Exec => {
            let program = config
                .program
                .clone()
                .filter(|p| !p.trim().is_empty())
                .ok_or(ConfigError::MissingProgram)?;
            Ok(Box::new(ExecBackend::new(
                program,
                config.args.clone(),
                config.timeout(),
            )))
        }
    }
}
