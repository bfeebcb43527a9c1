//! External command execution
//!
//! Commands are spawned directly (no shell) with piped output. A non-zero
//! exit is reported as an error value, never a panic. Children are killed
//! when the returned future is dropped, which covers both the timeout and
//! shutdown cancelling an in-flight poll.

use dynupdate_core::{Error, Result};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Result of one command execution
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Exit code, or -1 when the process was terminated by a signal
    pub exit_code: i32,
    /// Trimmed stdout
    pub stdout: String,
    /// Trimmed stderr
    pub stderr: String,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Render a program and its arguments for logs and error messages
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program args...` and capture its output, bounded by `limit`
///
/// A program that cannot be found is an environment error; a timeout or a
/// spawn failure is a command failure.
pub async fn exec(program: &str, args: &[&str], limit: Duration) -> Result<ExecResult> {
    let cmdline = command_line(program, args);
    tracing::debug!(command = %cmdline, "Executing command");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(limit, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::environment(format!("'{}' not found in PATH", program)));
        }
        Ok(Err(e)) => return Err(Error::command_failed(cmdline, e.to_string())),
        Err(_) => {
            return Err(Error::command_failed(
                cmdline,
                format!("timed out after {:?}", limit),
            ));
        }
    };

    let result = ExecResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    tracing::trace!(command = %cmdline, exit_code = result.exit_code, "Command finished");
    Ok(result)
}

/// Run a command and return its stdout, turning a non-zero exit into an error
pub async fn exec_stdout(program: &str, args: &[&str], limit: Duration) -> Result<String> {
    let result = exec(program, args, limit).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        let reason = if result.stderr.is_empty() {
            format!("exit status {}", result.exit_code)
        } else {
            format!("exit status {}: {}", result.exit_code, result.stderr)
        };
        Err(Error::command_failed(command_line(program, args), reason))
    }
}
