//! Toolchain presence checks.
//!
//! Host programs call [`need`] from their configure step to make sure the
//! compilers and utilities they are about to reference exist. Each tool is
//! looked up with `which` through the regular shell action runner, so a
//! missing tool is just a non-zero exit status rather than a build failure.

use thiserror::Error;

use crate::builder::action::{shell, ShellOptions};
use crate::builder::errors::BuildError;

/// Error from a presence check.
#[derive(Debug, Error)]
pub enum NeedError {
    #[error("need: '{tool}' is not found")]
    Missing { tool: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Outcome of looking up one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: String,
    /// Resolved path as printed by `which`, `None` if the tool is absent.
    pub path: Option<String>,
}

impl ToolStatus {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Check that every tool in `tools` can be found on `PATH`.
///
/// With `mandatory` set the first missing tool fails the check. Otherwise
/// missing tools are logged as warnings and reported in the result.
pub fn need<I, S>(tools: I, mandatory: bool) -> Result<Vec<ToolStatus>, NeedError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let opts = ShellOptions::default().unchecked().log_stdout(false);
    let mut statuses = Vec::new();

    for tool in tools {
        let tool = tool.as_ref();
        let output = shell("need", &format!("which {}", tool), &opts)?;

        if output.success() {
            tracing::info!("need: '{}' is found", tool);
            statuses.push(ToolStatus {
                tool: tool.to_string(),
                path: Some(output.stdout),
            });
        } else if mandatory {
            return Err(NeedError::Missing {
                tool: tool.to_string(),
            });
        } else {
            tracing::warn!("need: '{}' is not found", tool);
            statuses.push(ToolStatus {
                tool: tool.to_string(),
                path: None,
            });
        }
    }

    Ok(statuses)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const MISSING: &str = "tbs-surely-not-installed-tool";

    #[test]
    fn test_need_present_tool() {
        let statuses = need(["sh"], true).unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].found());
        assert!(statuses[0].path.as_deref().unwrap().ends_with("sh"));
    }

    #[test]
    fn test_need_missing_mandatory() {
        let err = need(["sh", MISSING], true).unwrap_err();
        assert!(matches!(err, NeedError::Missing { ref tool } if tool == MISSING));
        assert_eq!(err.to_string(), format!("need: '{}' is not found", MISSING));
    }

    #[test]
    fn test_need_missing_optional() {
        let statuses = need([MISSING], false).unwrap();
        assert_eq!(
            statuses,
            vec![ToolStatus {
                tool: MISSING.to_string(),
                path: None,
            }]
        );
    }

    #[test]
    fn test_need_empty_list() {
        assert!(need(Vec::<String>::new(), true).unwrap().is_empty());
    }
}
