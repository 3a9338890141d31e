use crate::error::ShellError;
use std::path::{Component, Path, PathBuf};

/// Resolves user-typed directory arguments against a base directory and HOME.
#[derive(Debug, Clone)]
pub struct PathExpander {
    home: Option<PathBuf>,
}

impl PathExpander {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, ShellError> {
        if path.starts_with('~') {
            self.expand_tilde(path)
        } else {
            Ok(PathBuf::from(path))
        }
    }

    fn expand_tilde(&self, path: &str) -> Result<PathBuf, ShellError> {
        if path.len() == 1 {
            return self.home_dir();
        }

        match path[1..].strip_prefix('/') {
            Some(stripped) => Ok(self.home_dir()?.join(stripped)),
            // "~user" forms are passed through untouched
            None => Ok(PathBuf::from(path)),
        }
    }

    /// Expands `path` and anchors it at `base` when relative. The result is
    /// lexically normalized.
    pub fn resolve(&self, base: &Path, path: &str) -> Result<PathBuf, ShellError> {
        let expanded = self.expand(path)?;
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        };
        Ok(normalize(&joined))
    }

    pub fn home_dir(&self) -> Result<PathBuf, ShellError> {
        self.home.clone().ok_or(ShellError::HomeDirNotFound)
    }
}

/// Drops `.` components and lets `..` pop the previous one, without touching
/// the filesystem. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.file_name().is_some() {
                    normalized.pop();
                } else if !path.is_absolute() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
