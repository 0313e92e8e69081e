//! Target definitions - what gets built.
//!
//! A [`Target`] is a node in the build graph. Its identifier is usually a
//! file path, and its [`Action`] says how to produce that file from the
//! target's sources. A target without an action is a leaf: a file the
//! engine expects to already exist.

use std::fmt;
use std::rc::Rc;

use crate::util::config::Env;

/// Signature of a programmatic action.
///
/// Called with the target identifier, its sources and the effective env.
/// The callback is expected to leave the target's artifact on disk.
pub type CallbackFn = dyn Fn(&str, &[String], &Env) -> anyhow::Result<()>;

/// A named programmatic action.
#[derive(Clone)]
pub struct Callback {
    name: String,
    func: Rc<CallbackFn>,
}

impl Callback {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str, &[String], &Env) -> anyhow::Result<()> + 'static,
    {
        Callback {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// Name shown in build logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, target: &str, sources: &[String], env: &Env) -> anyhow::Result<()> {
        (self.func)(target, sources, env)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("name", &self.name).finish()
    }
}

/// How a target is produced.
#[derive(Debug, Clone)]
pub enum Action {
    /// A shell command. Inside a [`Target`] the template has already been
    /// rendered against the env.
    Command(String),
    /// A Rust callback.
    Callback(Callback),
}

impl Action {
    /// Shorthand for [`Action::Command`].
    pub fn command(template: impl Into<String>) -> Self {
        Action::Command(template.into())
    }

    /// Shorthand for [`Action::Callback`].
    pub fn callback<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str, &[String], &Env) -> anyhow::Result<()> + 'static,
    {
        Action::Callback(Callback::new(name, func))
    }
}

impl From<&str> for Action {
    fn from(template: &str) -> Self {
        Action::Command(template.to_string())
    }
}

impl From<String> for Action {
    fn from(template: String) -> Self {
        Action::Command(template)
    }
}

impl From<Callback> for Action {
    fn from(callback: Callback) -> Self {
        Action::Callback(callback)
    }
}

/// A node in the build graph.
#[derive(Debug, Clone)]
pub struct Target {
    id: String,
    action: Option<Action>,
    sources: Vec<String>,
    env: Option<Env>,
}

impl Target {
    /// A target with no action and no sources: a pre-existing file.
    pub fn leaf(id: impl Into<String>) -> Self {
        Target {
            id: id.into(),
            action: None,
            sources: Vec::new(),
            env: None,
        }
    }

    pub(crate) fn new(
        id: String,
        action: Option<Action>,
        sources: Vec<String>,
        env: Option<Env>,
    ) -> Self {
        Target {
            id,
            action,
            sources,
            env,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Env override given at registration, if any.
    pub fn env(&self) -> Option<&Env> {
        self.env.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.action.is_none()
    }
}
