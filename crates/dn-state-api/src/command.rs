//! Running external programs.
//!
//! Programs are executed directly without a shell, with a hard time limit.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{CommandError, CommandResult};

/// A program invocation with fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalCommand {
    /// Create an invocation of `program` with `args`.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program and return its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started, exits unsuccessfully,
    /// or runs longer than the time limit.
    pub async fn run(&self) -> CommandResult<String> {
        debug!(program = %self.program, args = ?self.args, "running command");

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CommandError::Timeout {
                program: self.program.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let cmd = ExternalCommand::new("echo", ["hello", "world"], Duration::from_secs(5));
        let out = cmd.run().await.expect("echo should run");
        assert_eq!(out.trim(), "hello world");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let cmd = ExternalCommand::new(
            "definitely-not-a-real-program-dn",
            Vec::<String>::new(),
            Duration::from_secs(5),
        );
        let err = cmd.run().await.unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let cmd = ExternalCommand::new("false", Vec::<String>::new(), Duration::from_secs(5));
        let err = cmd.run().await.unwrap_err();
        assert!(matches!(err, CommandError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let cmd = ExternalCommand::new("sleep", ["5"], Duration::from_millis(100));
        let err = cmd.run().await.unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
    }

    #[test]
    fn test_no_shell_interpretation() {
        let cmd = ExternalCommand::new("ps", ["aux"], Duration::from_secs(1));
        assert_eq!(cmd.program(), "ps");
        assert_eq!(cmd.args, vec!["aux".to_string()]);
    }
}
