// runner.rs — CommandRunner trait and the std::process implementation.

use std::process::Command;

use crate::error::ExecError;

/// Captured result of one external command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code. `None` when the process was terminated by a signal.
    pub code: Option<i32>,

    /// Captured standard output, lossily decoded as UTF-8.
    pub stdout: String,

    /// Captured standard error, lossily decoded as UTF-8.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to run an external command and capture its exit status and
/// both output streams.
///
/// Components take `&dyn CommandRunner` rather than spawning processes
/// directly, which keeps the pipeline testable with recording doubles.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, blocking until it exits.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        tracing::debug!("exec: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ExecError::NotFound {
                    program: program.to_string(),
                },
                _ => ExecError::Spawn {
                    program: program.to_string(),
                    source,
                },
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = SystemRunner.run("sh", &["-c", "echo hello"]).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn captures_stderr_and_nonzero_exit() {
        let out = SystemRunner
            .run("sh", &["-c", "echo oops >&2; exit 3"])
            .unwrap();
        assert!(!out.success());
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn missing_binary_maps_to_not_found() {
        let err = SystemRunner
            .run("definitely-not-a-real-binary-4242", &[])
            .unwrap_err();
        assert!(matches!(err, ExecError::NotFound { .. }));
    }
}
