//! Shared test helpers for integration tests
//!
//! Every invocation gets its own config file so the developer's own
//! configuration never leaks into a test.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a tfc command with no config file influence
pub fn tfc() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tfc"));
    cmd.env_remove("TFC_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A temp directory holding a config file and, optionally, a scripted backend
pub struct TestEnv {
    pub dir: TempDir,
    pub config: PathBuf,
    pub call_log: PathBuf,
}

impl TestEnv {
    /// Dry-run backend, contract addresses configured for every collection
    pub fn dry_run() -> Self {
        Self::with_config(
            r#"network: testnet
sender: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
contracts:
  CAT-20: "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"
  tokens-policy-registry: "0x6B175474E89094C44Da98b954EedeAC495271d0F"
"#,
        )
    }

    /// Exec backend running a shell script that logs each request and prints `reply`
    pub fn exec(reply: &str) -> Self {
        let env = Self::with_config("");
        let script = env.dir.path().join("backend.sh");
        fs::write(
            &script,
            format!(
                "cat >> '{}'\ncat <<'REPLY'\n{}\nREPLY\n",
                env.call_log.display(),
                reply
            ),
        )
        .unwrap();
        fs::write(
            &env.config,
            format!(
                "network: testnet\nbackend:\n  kind: exec\n  program: sh\n  args: ['{}']\n  timeout_secs: 10\n",
                script.display()
            ),
        )
        .unwrap();
        env
    }

    pub fn with_config(yaml: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        let call_log = dir.path().join("calls.jsonl");
        fs::write(&config, yaml).unwrap();
        Self {
            dir,
            config,
            call_log,
        }
    }

    /// A tfc command reading this environment's config
    pub fn tfc(&self) -> Command {
        let mut cmd = tfc();
        cmd.env("TFC_CONFIG", &self.config);
        cmd
    }

    /// Requests received by the scripted backend, in order
    pub fn calls(&self) -> Vec<Value> {
        fs::read_to_string(&self.call_log)
            .unwrap_or_default()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

/// Successful backend reply carrying `result`
pub fn ok_reply(result: &str) -> String {
    format!(r#"{{"ok":true,"result":{}}}"#, result)
}

/// Failed backend reply
pub fn error_reply(code: &str, message: &str) -> String {
    format!(
        r#"{{"ok":false,"error":{{"code":"{}","message":"{}"}}}}"#,
        code, message
    )
}

/// Parse stdout of a finished command as JSON
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
