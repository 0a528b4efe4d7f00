//! Process-launching collaborator.

use std::process::{Command, Stdio};

use tracing::debug;

use refport_core::{BackendError, ProcessLauncher, RunOutput};

/// [`ProcessLauncher`] backed by `std::process::Command`.
///
/// The command line is tokenized on whitespace: the first token is the
/// program, the rest are its arguments. There is no shell interpretation
/// and no quoting support, matching the tokenization the instruction
/// language was designed around. Stringified handles contain no
/// whitespace, so an `IOR` substitution never changes the token
/// boundaries.
///
/// The launcher waits for the command to finish with no timeout; a
/// command that never exits blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysLauncher;

impl SysLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for SysLauncher {
    fn run(&self, command_line: &str) -> Result<RunOutput, BackendError> {
        let mut tokens = command_line.split_whitespace();
        let program = tokens.next().ok_or("empty command line")?;

        debug!(program, "running command");
        let output = Command::new(program)
            .args(tokens)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        // A process killed by a signal has no exit code; report it as a
        // negative status so the engine treats it as a failure.
        let exit_status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout_first_line = stdout.lines().next().unwrap_or("").to_string();

        Ok(RunOutput {
            exit_status,
            stdout_first_line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_first_stdout_line() {
        let output = SysLauncher.run("echo hello world").unwrap();
        assert_eq!(output.exit_status, 0);
        assert_eq!(output.stdout_first_line, "hello world");
    }

    #[test]
    fn no_output_yields_empty_first_line() {
        let output = SysLauncher.run("true").unwrap();
        assert_eq!(output.exit_status, 0);
        assert_eq!(output.stdout_first_line, "");
    }

    #[test]
    fn reports_nonzero_exit_status() {
        let output = SysLauncher.run("false").unwrap();
        assert_ne!(output.exit_status, 0);
    }

    #[test]
    fn spawn_failure_is_an_error() {
        assert!(SysLauncher.run("refport-no-such-command-xyz").is_err());
    }

    #[test]
    fn empty_command_line_is_an_error() {
        assert!(SysLauncher.run("").is_err());
        assert!(SysLauncher.run("   ").is_err());
    }
}
