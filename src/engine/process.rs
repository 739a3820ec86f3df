//! engine::process
//!
//! Running the test command.
//!
//! # Outcomes
//!
//! A run ends in one of these ways, and callers must keep them apart:
//!
//! - the process exited zero: [`TestVerdict::Passed`]
//! - the process ran and exited non-zero (or was killed by a signal):
//!   [`TestVerdict::Failed`], a normal result of testing
//! - the process could not be started at all: [`ProcessError::Launch`]
//! - it started but its output could not be collected: [`ProcessError::Capture`]
//!
//! # Output
//!
//! stdout and stderr share one pipe, so the captured output keeps the order
//! in which the test wrote it, as a terminal would show it.
//!
//! No timeout is imposed. A hung test blocks until the invoking process is
//! killed from outside.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::core::config::TestCommand;

/// Errors that prevent the test command from running.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started (missing, not executable, ...).
    #[error("failed to launch '{program}': {source}")]
    Launch {
        /// The program that was invoked
        program: String,
        source: io::Error,
    },

    /// The process started but its output or exit status could not be
    /// collected.
    #[error("failed to collect output of '{program}': {source}")]
    Capture {
        program: String,
        source: io::Error,
    },
}

/// Whether the test suite accepted the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestVerdict {
    Passed,
    Failed,
}

/// A completed test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub verdict: TestVerdict,
    /// Exit code, `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
}

/// Executes test commands.
pub trait ProcessRunner {
    /// Run `command` to completion in `dir`, capturing its output.
    fn run(&self, command: &TestCommand, dir: &Path) -> Result<TestRun, ProcessError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %command))]
    fn run(&self, command: &TestCommand, dir: &Path) -> Result<TestRun, ProcessError> {
        debug!(dir = %dir.display(), "spawning test command");

        let program = || command.program().to_string();
        let launch = |source: io::Error| {
            warn!(err = %source, "failed to launch test command");
            ProcessError::Launch {
                program: program(),
                source,
            }
        };
        let capture = |source: io::Error| ProcessError::Capture {
            program: program(),
            source,
        };

        let (mut reader, writer) = io::pipe().map_err(launch)?;

        // The Command holds write ends of the pipe; it must be dropped before
        // reading or the read never sees EOF.
        let mut child = {
            let mut cmd = Command::new(command.program());
            cmd.args(command.args())
                .current_dir(dir)
                .stdin(Stdio::null())
                .stdout(writer.try_clone().map_err(launch)?)
                .stderr(writer);
            cmd.spawn().map_err(launch)?
        };

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait().map_err(capture)?;
        read.map_err(capture)?;

        let verdict = if status.success() {
            TestVerdict::Passed
        } else {
            TestVerdict::Failed
        };

        debug!(exit_code = ?status.code(), ?verdict, "test command finished");
        Ok(TestRun {
            verdict,
            exit_code: status.code(),
            output: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}

/// A canned response for [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Exit zero with this output.
    Pass(String),
    /// Exit with this non-zero code and output.
    Fail(i32, String),
    /// Fail to launch.
    Unlaunchable,
}

/// Recorded invocation of a [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tokens: Vec<String>,
    pub dir: PathBuf,
}

/// Test double replaying scripted results in order.
///
/// Once the script runs out the last entry is repeated. Clones share state.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use tcr::core::config::TestCommand;
/// use tcr::engine::process::{ProcessRunner, Script, ScriptedRunner, TestVerdict};
///
/// let runner = ScriptedRunner::new(vec![Script::Fail(1, "boom".into())]);
/// let cmd = TestCommand::parse("./test.sh").unwrap();
///
/// let run = runner.run(&cmd, Path::new(".")).unwrap();
/// assert_eq!(run.verdict, TestVerdict::Failed);
/// assert_eq!(runner.invocations().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    inner: Arc<Mutex<ScriptedRunnerInner>>,
}

#[derive(Debug, Default)]
struct ScriptedRunnerInner {
    script: VecDeque<Script>,
    last: Option<Script>,
    invocations: Vec<Invocation>,
}

impl ScriptedRunner {
    pub fn new(script: Vec<Script>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedRunnerInner {
                script: script.into(),
                last: None,
                invocations: Vec::new(),
            })),
        }
    }

    /// A runner whose every run passes silently.
    pub fn passing() -> Self {
        Self::new(vec![Script::Pass(String::new())])
    }

    /// A runner whose every run fails with exit code 1.
    pub fn failing(output: &str) -> Self {
        Self::new(vec![Script::Fail(1, output.to_string())])
    }

    /// Every recorded invocation, oldest first.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.lock().unwrap().invocations.clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &TestCommand, dir: &Path) -> Result<TestRun, ProcessError> {
        let mut inner = self.inner.lock().unwrap();
        inner.invocations.push(Invocation {
            tokens: command.tokens().to_vec(),
            dir: dir.to_path_buf(),
        });

        let step = match inner.script.pop_front() {
            Some(step) => {
                inner.last = Some(step.clone());
                step
            }
            None => inner.last.clone().unwrap_or(Script::Pass(String::new())),
        };

        match step {
            Script::Pass(output) => Ok(TestRun {
                verdict: TestVerdict::Passed,
                exit_code: Some(0),
                output,
            }),
            Script::Fail(code, output) => Ok(TestRun {
                verdict: TestVerdict::Failed,
                exit_code: Some(code),
                output,
            }),
            Script::Unlaunchable => Err(ProcessError::Launch {
                program: command.program().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted launch failure"),
            }),
        }
    }
}
