//! Configuration loaded from a YAML file
//!
//! Lookup order: `--config` / `TFC_CONFIG`, then `<config_dir>/config.yaml`
//! in the platform configuration directory. A missing default file means
//! built-in defaults; a missing file that was named explicitly is an error.
//!
//! ```yaml
//! network: sepolia
//! sender: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
//! contracts:
//!   CAT-20: "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"
//!   tokens-policy-registry: "0x6B175474E89094C44Da98b954EedeAC495271d0F"
//! backend:
//!   kind: exec
//!   program: node
//!   args: [bridge.js]
//!   timeout_secs: 120
//! ```

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::CallContext;
use crate::core::error::ConfigError;

/// Config filename inside the platform config directory
pub const CONFIG_FILENAME: &str = "config.yaml";

const DEFAULT_NETWORK: &str = "local";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which backend executes commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Answer locally without contacting a chain
    #[default]
    DryRun,
    /// Delegate to an external program over stdin/stdout JSON
    Exec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,

    /// Program spawned by the exec backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Seconds to wait for a reply before killing the backend
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::DryRun,
            program: None,
            args: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network name passed to the backend
    pub network: String,

    /// Account that signs transactions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Contract address per collection name
    pub contracts: BTreeMap<String, String>,

    pub backend: BackendConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            sender: None,
            contracts: BTreeMap::new(),
            backend: BackendConfig::default(),
            source: None,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub network: Option<String>,
    pub sender: Option<String>,
    pub backend: Option<BackendKind>,
}

impl Config {
    /// Default config location in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tfc").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load from an explicit path, or the default location if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.display().to_string())),
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::parse(&raw).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse YAML content; an empty document yields the defaults
    pub fn parse(raw: &str) -> Result<Self, serde_yml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(raw)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(network) = &overrides.network {
            self.network = network.clone();
        }
        if let Some(sender) = &overrides.sender {
            self.sender = Some(sender.clone());
        }
        if let Some(kind) = overrides.backend {
            self.backend.kind = kind;
        }
    }

    /// Context for a call into `collection`; `contract` overrides the configured address
    pub fn call_context(&self, collection: &str, contract: Option<&str>) -> CallContext {
        CallContext {
            network: self.network.clone(),
            contract: contract
                .map(str::to_string)
                .or_else(|| self.contracts.get(collection).cloned()),
            sender: self.sender.clone(),
        }
    }
}
