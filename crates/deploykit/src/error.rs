//! Error types for deployment operations.
//!
//! Every failure the pipeline can hit is missing configuration, an external
//! command that failed, or output from a command that could not be understood.

use thiserror::Error;

/// Errors that can occur while resolving, granting, or deploying.
#[derive(Debug, Error)]
pub enum Error {
    /// The project identifier was not configured
    #[error("GOOGLE_CLOUD_PROJECT is not set")]
    MissingProject,

    /// The command could not be spawned at all
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Executable that failed to start
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully
    #[error("{program} exited with {}", describe_status(.status))]
    CommandFailed {
        /// Executable that failed
        program: String,
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Captured standard error (empty when streamed)
        stderr: String,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field expected in structured output was absent
    #[error("missing field in command output: {0}")]
    MissingField(&'static str),
}

impl Error {
    /// Captured stderr of a failed command, if there is any to show.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                Some(stderr.trim())
            }
            _ => None,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}

/// Result type for deployment operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let failed = Error::CommandFailed {
            program: "adk".to_string(),
            status: Some(2),
            stderr: String::new(),
        };
        assert_eq!(failed.to_string(), "adk exited with status 2");

        let killed = Error::CommandFailed {
            program: "adk".to_string(),
            status: None,
            stderr: String::new(),
        };
        assert_eq!(killed.to_string(), "adk exited with signal");
    }

    #[test]
    fn test_stderr_only_when_present() {
        let failed = Error::CommandFailed {
            program: "gcloud".to_string(),
            status: Some(1),
            stderr: "  ERROR: permission denied\n".to_string(),
        };
        assert_eq!(failed.stderr(), Some("ERROR: permission denied"));

        let blank = Error::CommandFailed {
            program: "gcloud".to_string(),
            status: Some(1),
            stderr: "\n".to_string(),
        };
        assert_eq!(blank.stderr(), None);
        assert_eq!(Error::MissingProject.stderr(), None);
    }
}
