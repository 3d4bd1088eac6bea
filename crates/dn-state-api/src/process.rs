//! Process table listing via `ps aux`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;

use crate::command::ExternalCommand;
use crate::error::{CommandError, CommandResult};

/// Index of the first command column in `ps aux` output.
const COMMAND_COLUMN: usize = 10;

/// One row of the filtered process table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessEntry {
    /// Owning user.
    pub user: String,
    /// Process ID, as printed.
    pub pid: String,
    /// Full command line.
    pub command: String,
}

/// Source of the raw process table.
pub trait ProcessListProvider: Send + Sync {
    /// List all processes in `ps aux` format, header included.
    fn process_table(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>>;
}

/// Process table provider backed by `ps aux`.
#[derive(Debug, Clone)]
pub struct PsProcessLister {
    command: ExternalCommand,
}

impl PsProcessLister {
    /// Create a provider running `program aux`.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: ExternalCommand::new(program, ["aux"], timeout),
        }
    }
}

impl ProcessListProvider for PsProcessLister {
    fn process_table(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>> {
        Box::pin(self.command.run())
    }
}

/// Select the rows of `ps aux` output that contain `pattern`.
///
/// The header line and blank rows are skipped.
pub fn parse_ps_output(output: &str, pattern: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(pattern))
        .map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            ProcessEntry {
                user: parts.first().copied().unwrap_or_default().to_string(),
                pid: parts.get(1).copied().unwrap_or_default().to_string(),
                command: parts.get(COMMAND_COLUMN..).unwrap_or_default().join(" "),
            }
        })
        .collect()
}

/// Fake process table for tests.
#[derive(Debug, Clone)]
pub struct FakeProcessList {
    output: Option<String>,
}

impl FakeProcessList {
    /// A provider that prints `output`.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
        }
    }

    /// A provider whose program exits with an error.
    #[must_use]
    pub const fn failing() -> Self {
        Self { output: None }
    }
}

impl ProcessListProvider for FakeProcessList {
    fn process_table(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>> {
        let result = self.output.clone().ok_or_else(|| CommandError::Failed {
            program: "ps".to_string(),
            status: "exit status: 1".to_string(),
            stderr: String::new(),
        });
        Box::pin(async move { result })
    }
}
