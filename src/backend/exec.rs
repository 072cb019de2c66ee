//! External-process backend
//!
//! Spawns the configured program once per call, writes the [`BackendCall`]
//! as a single JSON line to its stdin and reads one JSON reply from stdout:
//!
//! ```text
//! {"ok": true, "result": {...}}
//! {"ok": false, "error": {"code": "NOT_ALLOWED", "message": "..."}}
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::{Backend, BackendCall};
use crate::core::error::BackendError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Bridges calls to an external program (a node script, a signer, ...)
pub struct ExecBackend {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<ReplyError>,
}

#[derive(Debug, Deserialize)]
struct ReplyError {
    code: String,
    #[serde(default)]
    message: String,
}

impl ExecBackend {
    pub fn new(program: String, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program,
            args,
            timeout,
        }
    }
}

impl Backend for ExecBackend {
    fn name(&self) -> &'static str {
        "exec"
    }

    fn call(&self, call: &BackendCall) -> Result<Value, BackendError> {
        let method = call.method.as_str();
        let request = serde_json::to_string(call)
            .map_err(|e| BackendError::new(method, "BAD_REQUEST", e.to_string()))?;

        tracing::debug!(program = %self.program, id = %call.id, "spawning backend process");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BackendError::new(method, "SPAWN_FAILED", format!("{}: {}", self.program, e))
            })?;

        let stdin = feed(child.stdin.take(), request);
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_with_timeout(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                return Err(BackendError::new(
                    method,
                    "TIMEOUT",
                    format!("no reply within {:?}", self.timeout),
                ))
            }
            Err(e) => return Err(BackendError::new(method, "IO", e.to_string())),
        };

        // A backend that exits without reading its input still gets to reply
        if let Ok(Err(e)) = stdin.join() {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(BackendError::new(method, "IO", e.to_string()));
            }
        }

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        parse_reply(method, &stdout, &stderr, status)
    }
}

/// Write the request off the caller's thread; the deadline holds even when
/// the backend never reads its input
fn feed<W: Write + Send + 'static>(
    pipe: Option<W>,
    request: String,
) -> thread::JoinHandle<io::Result<()>> {
    thread::spawn(move || match pipe {
        Some(mut pipe) => writeln!(pipe, "{}", request),
        None => Ok(()),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

/// Wait for the child; kill it and return `None` once the deadline passes
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn parse_reply(
    method: &str,
    stdout: &str,
    stderr: &str,
    status: ExitStatus,
) -> Result<Value, BackendError> {
    let trimmed = stdout.trim();
    let reply = serde_json::from_str::<Reply>(trimmed).or_else(|e| {
        // Tolerate log lines before the reply
        trimmed
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .ok_or(e)
            .and_then(|line| serde_json::from_str::<Reply>(line.trim()))
    });

    match reply {
        Ok(Reply { ok: true, result, .. }) => Ok(result),
        Ok(Reply {
            ok: false, error, ..
        }) => Err(match error {
            Some(err) => BackendError::new(method, err.code, err.message),
            None => BackendError::new(method, "UNKNOWN", "backend reported failure without an error"),
        }),
        Err(_) if !status.success() => {
            let code = status
                .code()
                .map(|c| format!("EXIT_{}", c))
                .unwrap_or_else(|| "EXIT_SIGNAL".to_string());
            let message = match stderr.trim() {
                "" => format!("backend exited with {}", status),
                text => text.to_string(),
            };
            Err(BackendError::new(method, code, message))
        }
        Err(e) => Err(BackendError::new(
            method,
            "BAD_REPLY",
            format!("unparsable backend reply: {}", e),
        )),
    }
}
