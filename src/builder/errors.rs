//! Build error types.

use std::io;

use miette::Diagnostic;
use thiserror::Error;

use crate::util::template::TemplateError;

/// Error raised while declaring or building targets.
///
/// Every variant aborts the enclosing top-level build. Nothing is retried
/// and partially written artifacts are left in place.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("{target}: unknown target")]
    #[diagnostic(
        code(tbs::build::unknown_target),
        help("declare the target with `add_rule` before building it")
    )]
    UnknownTarget { target: String },

    #[error("{target}: file not found")]
    #[diagnostic(
        code(tbs::build::missing_artifact),
        help("`{target}` has no action, so it must already exist on disk")
    )]
    MissingArtifact { target: String },

    #[error("{target}: failed{}", exit_suffix(.code))]
    #[diagnostic(code(tbs::build::action_failed))]
    ActionFailed {
        target: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{target}: {source:#}")]
    #[diagnostic(code(tbs::build::callback_failed))]
    Callback {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{target}: action did not produce the file")]
    #[diagnostic(
        code(tbs::build::artifact_not_produced),
        help("make sure the command writes `{target}`")
    )]
    ArtifactNotProduced { target: String },

    #[error("{target}: failed to execute `{command}`")]
    #[diagnostic(code(tbs::build::spawn))]
    Spawn {
        target: String,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{target}: failed to stat")]
    #[diagnostic(code(tbs::build::io))]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("{target}: invalid command template")]
    #[diagnostic(
        code(tbs::build::template),
        help("placeholders must name env keys; double a brace to write it literally")
    )]
    Template {
        target: String,
        #[source]
        source: TemplateError,
    },

    #[error("dependency cycle: {}", .chain.join(" -> "))]
    #[diagnostic(
        code(tbs::build::cycle),
        help("break the cycle by removing one of the listed sources")
    )]
    Cycle { chain: Vec<String> },
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit status {})", code),
        None => " (terminated by signal)".to_string(),
    }
}

impl BuildError {
    /// The target the failure is attributed to.
    ///
    /// For a cycle this is the first repeated target.
    pub fn target(&self) -> Option<&str> {
        match self {
            BuildError::UnknownTarget { target }
            | BuildError::MissingArtifact { target }
            | BuildError::ActionFailed { target, .. }
            | BuildError::Callback { target, .. }
            | BuildError::ArtifactNotProduced { target }
            | BuildError::Spawn { target, .. }
            | BuildError::Io { target, .. }
            | BuildError::Template { target, .. } => Some(target),
            BuildError::Cycle { chain } => chain.first().map(String::as_str),
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
