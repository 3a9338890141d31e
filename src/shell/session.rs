use std::{
    collections::HashMap,
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{error::ShellError, path::PathIndex};

/// State that lives for the whole shell process.
#[derive(Debug, Clone)]
pub struct Session {
    current_dir: PathBuf,
    env: HashMap<String, String>,
}

impl Session {
    pub fn new(current_dir: PathBuf, env: HashMap<String, String>) -> Self {
        Self { current_dir, env }
    }

    /// Snapshots the process working directory and environment. Variables that
    /// are not valid UTF-8 are left out and logged.
    pub fn from_process() -> Result<Self, ShellError> {
        let current_dir = env::current_dir()?;
        Ok(Self::new(current_dir, utf8_vars(env::vars_os())))
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub(crate) fn set_current_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    /// `HOME` from the snapshot, else the platform home directory.
    pub fn home(&self) -> Option<PathBuf> {
        self.var("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
    }

    /// Rebuilds the executable index from the current `PATH`.
    pub fn path_index(&self) -> PathIndex {
        PathIndex::load(self.var("PATH").unwrap_or_default())
    }
}

fn utf8_vars<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let name = key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                debug!("dropping non-UTF-8 environment variable {}", name);
                None
            }
        })
        .collect()
}
