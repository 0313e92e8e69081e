//! Incremental build resolution.
//!
//! The engine walks the graph depth-first from the requested target. For
//! each target it first brings every source up to date, then compares
//! modification times to decide whether the target's own action must run:
//!
//! - a leaf is never run; its file must exist,
//! - a target with an action but no sources always runs,
//! - otherwise it runs when its file is missing or some source is strictly
//!   newer than it.
//!
//! Equal timestamps count as up to date.

use std::time::SystemTime;

use crate::builder::action;
use crate::builder::errors::{BuildError, BuildResult};
use crate::core::graph::TargetGraph;
use crate::core::target::{Action, Target};
use crate::util::fs::modified;

/// Why a target has to be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebuild {
    /// The target declares no sources to compare against.
    NoSources,
    /// The target's file doesn't exist.
    Missing,
    /// The source at this index is newer than the target.
    Outdated(usize),
}

/// Decide whether a target with sources must be rebuilt.
///
/// `artifact` is the target's current modification time, `stamps` the
/// freshness of each source in declared order.
pub fn staleness(artifact: Option<SystemTime>, stamps: &[SystemTime]) -> Option<Rebuild> {
    let Some(mtime) = artifact else {
        return Some(Rebuild::Missing);
    };
    stamps
        .iter()
        .position(|stamp| *stamp > mtime)
        .map(Rebuild::Outdated)
}

/// One top-level build over a [`TargetGraph`].
///
/// Tracks the chain of targets currently being resolved so that a
/// dependency cycle fails instead of recursing forever.
pub struct Engine<'g> {
    graph: &'g TargetGraph,
    chain: Vec<String>,
}

impl<'g> Engine<'g> {
    pub fn new(graph: &'g TargetGraph) -> Self {
        Engine {
            graph,
            chain: Vec::new(),
        }
    }

    /// Bring `id` up to date and return its freshness timestamp.
    pub fn build(mut self, id: &str) -> BuildResult<SystemTime> {
        self.resolve(id)
    }

    fn resolve(&mut self, id: &str) -> BuildResult<SystemTime> {
        let graph = self.graph;
        let target = graph.get(id).ok_or_else(|| BuildError::UnknownTarget {
            target: id.to_string(),
        })?;

        if let Some(start) = self.chain.iter().position(|t| t == id) {
            let mut chain = self.chain[start..].to_vec();
            chain.push(id.to_string());
            return Err(BuildError::Cycle { chain });
        }

        self.chain.push(id.to_string());
        let result = self.resolve_target(target);
        self.chain.pop();
        result
    }

    fn resolve_target(&mut self, target: &Target) -> BuildResult<SystemTime> {
        let Some(action) = target.action() else {
            return stat(target)?.ok_or_else(|| BuildError::MissingArtifact {
                target: target.id().to_string(),
            });
        };

        let (artifact, rebuild) = if target.sources().is_empty() {
            (None, Some(Rebuild::NoSources))
        } else {
            let mut stamps = Vec::with_capacity(target.sources().len());
            for source in target.sources() {
                stamps.push(self.resolve(source)?);
            }
            let artifact = stat(target)?;
            (artifact, staleness(artifact, &stamps))
        };

        let Some(reason) = rebuild else {
            tracing::info!("{}: up to date", target.id());
            // Only reachable with an existing artifact.
            return artifact.ok_or_else(|| BuildError::MissingArtifact {
                target: target.id().to_string(),
            });
        };

        match &reason {
            Rebuild::Outdated(index) => tracing::debug!(
                "{}: rebuilding, `{}` is newer",
                target.id(),
                target.sources()[*index]
            ),
            Rebuild::Missing => tracing::debug!("{}: rebuilding, file is missing", target.id()),
            Rebuild::NoSources => tracing::debug!("{}: rebuilding, no sources", target.id()),
        }

        let env = target.env().unwrap_or(self.graph.env());
        action::execute(target, env)?;

        match (stat(target)?, action) {
            (Some(mtime), _) => Ok(mtime),
            (None, Action::Command(_)) => Err(BuildError::ArtifactNotProduced {
                target: target.id().to_string(),
            }),
            (None, Action::Callback(_)) => {
                tracing::debug!("{}: no file after callback, treating as fresh now", target.id());
                Ok(SystemTime::now())
            }
        }
    }
}

fn stat(target: &Target) -> BuildResult<Option<SystemTime>> {
    modified(target.id()).map_err(|source| BuildError::Io {
        target: target.id().to_string(),
        source,
    })
}
