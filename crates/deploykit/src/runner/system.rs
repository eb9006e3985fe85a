//! Runner that executes real processes with `std::process`.

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation, Outcome, OutputMode};
use std::process::{Command, Stdio};

/// Runner backed by real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new SystemRunner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn execute(&self, invocation: &Invocation) -> Result<Outcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        let spawn_err = |source| Error::Spawn {
            program: invocation.program.clone(),
            source,
        };

        match invocation.mode {
            OutputMode::Capture => {
                let output = cmd.output().map_err(spawn_err)?;
                log::trace!("{} exited with {}", invocation.program, output.status);

                if output.status.success() {
                    Ok(Outcome::Captured(
                        String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    ))
                } else {
                    Err(Error::CommandFailed {
                        program: invocation.program.clone(),
                        status: output.status.code(),
                        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    })
                }
            }
            OutputMode::Stream => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_err)?;
                log::trace!("{} exited with {status}", invocation.program);

                if status.success() {
                    Ok(Outcome::Streamed)
                } else {
                    Err(Error::CommandFailed {
                        program: invocation.program.clone(),
                        status: status.code(),
                        stderr: String::new(),
                    })
                }
            }
        }
    }
}

/// Check if a command exists on PATH, or at the given path if it has one.
pub fn command_exists(program: &str) -> bool {
    match which::which(program) {
        Ok(path) => {
            log::trace!("{program} resolved to {}", path.display());
            true
        }
        Err(_) => false,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::report::{Event, RecordingReporter};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", "script failed").args(["-c", script])
    }

    #[test]
    fn test_capture_trims_stdout() {
        let outcome = SystemRunner::new()
            .execute(&sh("printf '  123456 \\n\\n'"))
            .unwrap();
        assert_eq!(outcome, Outcome::Captured("123456".to_string()));
    }

    #[test]
    fn test_capture_failure_keeps_stderr() {
        let err = SystemRunner::new()
            .execute(&sh("echo denied >&2; exit 3"))
            .unwrap_err();
        match err {
            Error::CommandFailed { status, stderr, .. } => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr.trim(), "denied");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stream_success_and_failure() {
        let runner = SystemRunner::new();
        assert_eq!(
            runner.execute(&sh("true").streamed()).unwrap(),
            Outcome::Streamed
        );
        assert!(runner.execute(&sh("exit 1").streamed()).is_err());
    }

    #[test]
    fn test_run_reports_label_on_nonzero_exit() {
        let reporter = RecordingReporter::new();
        let outcome = SystemRunner::new().run(&sh("exit 1"), &reporter);
        assert_eq!(outcome, None);
        assert_eq!(
            reporter.events().first(),
            Some(&Event::Error("script failed".to_string()))
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let inv = Invocation::new("definitely-not-a-real-binary-xyz", "missing");
        let err = SystemRunner::new().execute(&inv).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_command_exists_rejects_unknown() {
        assert!(!command_exists("definitely-not-a-real-binary-xyz"));
        assert!(!command_exists("/nonexistent/bin/gcloud"));
    }

    #[test]
    fn test_command_exists_accepts_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gcloud");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(command_exists(&path.to_string_lossy()));
    }
}
