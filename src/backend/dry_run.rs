//! Dry-run backend: validates the round trip without touching a chain

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::{Backend, BackendCall};
use crate::core::command::CommandKind;
use crate::core::error::BackendError;

/// Answers every call locally
///
/// Transactions get a deterministic pseudo transaction hash derived from the
/// call (the invocation id is excluded so identical calls hash identically).
pub struct DryRunBackend;

impl DryRunBackend {
    /// SHA-256 over the call's collection, method, params and context
    pub fn call_hash(call: &BackendCall) -> String {
        let canonical = json!({
            "collection": call.collection,
            "method": call.method,
            "params": call.params,
            "context": call.context,
        });
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        format!("0x{:x}", digest)
    }
}

impl Backend for DryRunBackend {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn call(&self, call: &BackendCall) -> Result<Value, BackendError> {
        Ok(match call.kind {
            CommandKind::Transaction => json!({
                "dryRun": true,
                "method": call.method,
                "txHash": Self::call_hash(call),
            }),
            CommandKind::Query => json!({
                "dryRun": true,
                "method": call.method,
            }),
        })
    }
}
