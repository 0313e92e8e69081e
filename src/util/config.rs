//! Build configuration shared with actions.
//!
//! An [`Env`] is a flat string-to-string mapping (compiler names, flags,
//! target architecture, ...). Command templates are rendered against it when
//! a target is declared, and callbacks receive it when they run.
//!
//! Host programs usually persist their env between invocations as a JSON
//! object in `.<program>.env` in the working directory, so that a
//! `configure` step can record choices that later `build` steps consume.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Fallback env file name when the program name can't be determined.
pub const DEFAULT_ENV_FILENAME: &str = ".tbs.env";

/// Key/value configuration handed to actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env {
    vars: BTreeMap<String, String>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Env {
    /// Create an empty env with no backing file.
    pub fn new() -> Self {
        Env::default()
    }

    /// Load an env from `path`, starting empty if the file doesn't exist.
    ///
    /// The returned env remembers `path` so that [`Env::save`] writes back
    /// to the same place.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let vars = if path.is_file() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read env: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse env: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        let env = Env {
            vars,
            path: Some(path),
        };
        tracing::debug!("loaded env: {}", env);
        Ok(env)
    }

    /// Persist the env to its backing file.
    ///
    /// An empty env removes the file instead of writing `{}`.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            bail!("env has no backing file");
        };

        if self.vars.is_empty() {
            if path.is_file() {
                std::fs::remove_file(path)
                    .with_context(|| format!("failed to remove env: {}", path.display()))?;
            }
        } else {
            let contents =
                serde_json::to_string_pretty(&self.vars).context("failed to serialize env")?;
            std::fs::write(path, contents)
                .with_context(|| format!("failed to write env: {}", path.display()))?;
        }

        tracing::debug!("saved env: {}", self);
        Ok(())
    }

    /// Default env location for the running program: `.<program>.env`.
    pub fn default_path() -> PathBuf {
        let name = std::env::args_os()
            .next()
            .and_then(|arg0| {
                Path::new(&arg0)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .filter(|n| !n.is_empty());

        match name {
            Some(name) => PathBuf::from(format!(".{}.env", name)),
            None => PathBuf::from(DEFAULT_ENV_FILENAME),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.vars.iter()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Env {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.vars.insert(k.into(), v.into());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Env::new();
        env.extend(iter);
        env
    }
}

impl<'a> IntoIterator for &'a Env {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", k, v)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let env = Env::load(tmp.path().join(".build.env")).unwrap();
        assert!(env.is_empty());
        assert_eq!(env.path(), Some(tmp.path().join(".build.env").as_path()));
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".build.env");

        let mut env = Env::load(&path).unwrap();
        env.insert("arch", "x86_64");
        env.insert("cxx", "clang++");
        env.save().unwrap();

        let reloaded = Env::load(&path).unwrap();
        assert_eq!(reloaded.get("arch"), Some("x86_64"));
        assert_eq!(reloaded.get("cxx"), Some("clang++"));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_save_empty_removes_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".build.env");
        fs_write(&path, r#"{"arch": "x86_64"}"#);

        let mut env = Env::load(&path).unwrap();
        assert_eq!(env.get("arch"), Some("x86_64"));

        env.clear();
        env.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut env = Env::new();
        env.insert("a", "b");
        assert!(env.save().is_err());
    }

    #[test]
    fn test_load_rejects_non_string_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".build.env");
        fs_write(&path, r#"{"jobs": 4}"#);

        assert!(Env::load(&path).is_err());
    }

    #[test]
    fn test_display_is_sorted() {
        let env: Env = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(env.to_string(), r#"{a: "1", b: "2"}"#);
    }

    fn fs_write(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }
}
