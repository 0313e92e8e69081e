//! The target registry.
//!
//! A [`TargetGraph`] maps identifiers to [`Target`]s and owns the default
//! [`Env`] handed to actions. Host programs declare every target first and
//! then ask for one of them to be built:
//!
//! ```no_run
//! use tbs::TargetGraph;
//!
//! let mut graph = TargetGraph::new();
//! graph.env_mut().insert("cc", "cc");
//! graph.add_rule("build/main.o", "{cc} -c main.c -o build/main.o", ["main.c"])?;
//! graph.add_rule("build/app", "{cc} build/main.o -o build/app", ["build/main.o"])?;
//! graph.build("build/app")?;
//! # Ok::<(), tbs::BuildError>(())
//! ```

use std::collections::HashMap;
use std::time::SystemTime;

use crate::builder::engine::Engine;
use crate::builder::errors::{BuildError, BuildResult};
use crate::core::target::{Action, Target};
use crate::util::config::Env;
use crate::util::template;

/// Registry of build targets.
#[derive(Debug, Default)]
pub struct TargetGraph {
    targets: HashMap<String, Target>,
    env: Env,
}

impl TargetGraph {
    pub fn new() -> Self {
        TargetGraph::default()
    }

    /// Create a graph whose targets default to `env`.
    pub fn with_env(env: Env) -> Self {
        TargetGraph {
            targets: HashMap::new(),
            env,
        }
    }

    /// Default env for targets registered without their own.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Mutable access to the default env.
    ///
    /// Command templates are rendered when a target is registered, so
    /// changes made here don't reach commands already declared. Callbacks
    /// see the env as it is when they run.
    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    /// Declare a target, replacing any previous declaration of `id`.
    ///
    /// Command templates are rendered against `env` (or the graph's default
    /// env) right away. Sources that aren't registered yet are added as
    /// leaves. If rendering fails nothing is registered.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        action: Option<Action>,
        sources: Vec<String>,
        env: Option<Env>,
    ) -> BuildResult<()> {
        let id = id.into();

        let action = match action {
            Some(Action::Command(template)) => {
                let effective = env.as_ref().unwrap_or(&self.env);
                let rendered = template::render(&template, effective).map_err(|source| {
                    BuildError::Template {
                        target: id.clone(),
                        source,
                    }
                })?;
                Some(Action::Command(rendered))
            }
            other => other,
        };

        for source in &sources {
            self.ensure_leaf(source);
        }

        if self.targets.contains_key(&id) {
            tracing::debug!("{}: replacing previous declaration", id);
        }
        self.targets
            .insert(id.clone(), Target::new(id, action, sources, env));
        Ok(())
    }

    /// Declare a target that uses the graph's default env.
    pub fn add_rule<A, I, S>(
        &mut self,
        id: impl Into<String>,
        action: A,
        sources: I,
    ) -> BuildResult<()>
    where
        A: Into<Action>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources = sources.into_iter().map(Into::into).collect();
        self.register(id, Some(action.into()), sources, None)
    }

    /// Declare a pre-existing file, replacing any previous declaration.
    pub fn add_leaf(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.targets.insert(id.clone(), Target::leaf(id));
    }

    /// Register `id` as a leaf unless it is already known.
    fn ensure_leaf(&mut self, id: &str) {
        if !self.targets.contains_key(id) {
            self.targets.insert(id.to_string(), Target::leaf(id));
        }
    }

    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Bring `id` up to date and return its freshness timestamp.
    ///
    /// Sources are built first, depth-first in declared order. Nothing is
    /// cached between calls: every call walks the graph again.
    pub fn build(&self, id: &str) -> BuildResult<SystemTime> {
        if !self.contains(id) {
            return Err(BuildError::UnknownTarget {
                target: id.to_string(),
            });
        }
        Engine::new(self).build(id)
    }
}
