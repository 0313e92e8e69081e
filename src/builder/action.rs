//! Action execution.
//!
//! Runs the action attached to a target: either a shell command whose output
//! is captured and logged, or a Rust callback.

use crate::builder::errors::{BuildError, BuildResult};
use crate::core::target::{Action, Target};
use crate::util::config::Env;
use crate::util::process::{ProcessBuilder, ProcessOutput};

/// Options for a single [`shell`] invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    /// Turn a non-zero exit status into [`BuildError::ActionFailed`].
    pub check: bool,
    /// Log captured stdout as a notice.
    pub log_stdout: bool,
    /// Log captured stderr as a warning.
    pub log_stderr: bool,
}

impl Default for ShellOptions {
    fn default() -> Self {
        ShellOptions {
            check: true,
            log_stdout: true,
            log_stderr: true,
        }
    }
}

impl ShellOptions {
    /// Report non-zero exit status to the caller instead of failing.
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    pub fn log_stdout(mut self, log: bool) -> Self {
        self.log_stdout = log;
        self
    }

    pub fn log_stderr(mut self, log: bool) -> Self {
        self.log_stderr = log;
        self
    }
}

/// Run `command` through the shell on behalf of `label`.
///
/// `label` is the target (or helper) name errors and log lines are
/// attributed to. Callbacks use this to run their own commands.
pub fn shell(label: &str, command: &str, opts: &ShellOptions) -> BuildResult<ProcessOutput> {
    run(label, command, &ProcessBuilder::shell(command), opts)
}

fn run(
    label: &str,
    command: &str,
    process: &ProcessBuilder,
    opts: &ShellOptions,
) -> BuildResult<ProcessOutput> {
    tracing::debug!("{}: executing '{}'", label, command);

    let output: ProcessOutput = process
        .exec()
        .map_err(|source| BuildError::Spawn {
            target: label.to_string(),
            command: command.to_string(),
            source,
        })?
        .into();

    if !output.stdout.is_empty() && opts.log_stdout {
        tracing::debug!("{}", output.stdout);
    }
    if !output.stderr.is_empty() && opts.log_stderr {
        tracing::warn!("{}", output.stderr);
    }

    if opts.check && !output.success() {
        return Err(BuildError::ActionFailed {
            target: label.to_string(),
            code: output.code,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

/// Run the action of `target` once.
///
/// Leaves have nothing to run and succeed trivially.
pub fn execute(target: &Target, env: &Env) -> BuildResult<()> {
    match target.action() {
        None => return Ok(()),
        Some(Action::Command(command)) => {
            shell(target.id(), command, &ShellOptions::default())?;
        }
        Some(Action::Callback(callback)) => {
            tracing::debug!("{}: calling '{}'", target.id(), callback.name());
            callback
                .call(target.id(), target.sources(), env)
                .map_err(|source| BuildError::Callback {
                    target: target.id().to_string(),
                    source,
                })?;
        }
    }

    tracing::info!("{}: success", target.id());
    Ok(())
}
