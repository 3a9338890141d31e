use std::{
    collections::BTreeMap,
    env, fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use log::{debug, trace};

/// Executable names found on the search path, mapped to their absolute location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
    commands: BTreeMap<String, PathBuf>,
}

impl PathIndex {
    /// Scans every directory of `path_var` in order. The first directory that
    /// provides a name keeps it; unreadable or missing directories are skipped.
    pub fn load(path_var: &str) -> Self {
        let mut commands = BTreeMap::new();
        let mut scanned = 0usize;

        for dir in env::split_paths(path_var) {
            if dir.as_os_str().is_empty() {
                continue;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    trace!("skipping {}: {}", dir.display(), err);
                    continue;
                }
            };
            scanned += 1;

            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                if !is_executable(&path) {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    commands
                        .entry(name.to_string())
                        .or_insert_with(|| std::path::absolute(&path).unwrap_or(path));
                }
            }
        }

        debug!(
            "path index rebuilt: {} directories, {} commands",
            scanned,
            commands.len()
        );
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.commands.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromIterator<(String, PathBuf)> for PathIndex {
    fn from_iter<I: IntoIterator<Item = (String, PathBuf)>>(iter: I) -> Self {
        let mut commands = BTreeMap::new();
        for (name, path) in iter {
            commands.entry(name).or_insert(path);
        }
        Self { commands }
    }
}

fn is_executable(path: &Path) -> bool {
    // Follows symlinks, so a link to an executable counts.
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    fn join_paths(dirs: &[&Path]) -> String {
        env::join_paths(dirs).unwrap().into_string().unwrap()
    }

    #[test]
    fn test_first_directory_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = make_file(first.path(), "x", 0o755);
        make_file(second.path(), "x", 0o755);

        let index = PathIndex::load(&join_paths(&[first.path(), second.path()]));
        assert_eq!(index.get("x"), Some(expected.as_path()));
    }

    #[test]
    fn test_skips_non_executables_and_directories() {
        let dir = TempDir::new().unwrap();
        make_file(dir.path(), "runme", 0o700);
        make_file(dir.path(), "readme", 0o644);
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let index = PathIndex::load(&join_paths(&[dir.path()]));
        assert!(index.contains("runme"));
        assert!(!index.contains("readme"));
        assert!(!index.contains("subdir"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_directories_are_ignored() {
        let dir = TempDir::new().unwrap();
        make_file(dir.path(), "tool", 0o755);
        let missing = dir.path().join("does-not-exist");

        let index = PathIndex::load(&join_paths(&[missing.as_path(), dir.path()]));
        assert!(index.contains("tool"));
    }

    #[test]
    fn test_empty_path_yields_empty_index() {
        assert!(PathIndex::load("").is_empty());
    }

    #[test]
    fn test_from_iter_keeps_first_entry() {
        let index: PathIndex = vec![
            ("ls".to_string(), PathBuf::from("/bin/ls")),
            ("ls".to_string(), PathBuf::from("/usr/bin/ls")),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.get("ls"), Some(Path::new("/bin/ls")));
    }
}
