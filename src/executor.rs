//! The Executor: runs a [`TestBlock`]'s command through a real subshell and
//! captures merged stdout+stderr.

use crate::error::OperatorError;
use std::process::{Command, Stdio};

/// Captured result of running one command.
pub struct Captured {
    pub bytes: Vec<u8>,
    #[allow(dead_code)] // exit status is captured but intentionally unused for pass/fail
    pub status: Option<i32>,
}

/// Runs `command` through `shell -c`, with stdout and stderr merged into a
/// single byte stream, in the current working directory. No stdin is fed to
/// the child and no timeout is applied.
///
/// Standard output and standard error are merged by wrapping the command in
/// a subshell and redirecting `2>&1` *inside* that subshell, so the merge
/// happens with the kernel's own fd semantics rather than by
/// racily re-interleaving two separately captured pipes.
pub fn execute(shell: &str, command: &str) -> Result<Captured, OperatorError> {
    let wrapped = format!("{{ {command} ; }} 2>&1");

    let output = Command::new(shell)
        .arg("-c")
        .arg(&wrapped)
        .stdin(Stdio::null())
        .output()
        .map_err(OperatorError::ShellSpawn)?;

    Ok(Captured { bytes: output.stdout, status: output.status.code() })
}
