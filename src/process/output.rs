use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use log::warn;

use crate::parser::Redirections;

/// A writable destination shared between the shell and a drain thread.
pub type Sink<'a> = &'a mut (dyn Write + Send);

/// Files opened for a command's redirections. Dropping the value closes them.
#[derive(Debug, Default)]
pub struct OutputTargets {
    stdout: Option<File>,
    stderr: Option<File>,
}

impl OutputTargets {
    /// Opens every non-empty redirection target relative to `cwd`. A target
    /// that cannot be opened is reported on `diagnostics` and left out, so the
    /// stream falls back to the terminal.
    pub fn open(redirections: &Redirections, cwd: &Path, diagnostics: &mut dyn Write) -> Self {
        let stdout = redirections
            .stdout
            .as_deref()
            .and_then(|target| open_or_report(target, redirections.stdout_append, cwd, diagnostics));
        let stderr = redirections
            .stderr
            .as_deref()
            .and_then(|target| open_or_report(target, redirections.stderr_append, cwd, diagnostics));

        Self { stdout, stderr }
    }

    /// Picks the file for each stream, or the given terminal stream when the
    /// stream is not redirected.
    pub fn writers<'a>(&'a mut self, out: Sink<'a>, err: Sink<'a>) -> (Sink<'a>, Sink<'a>) {
        let stdout: Sink<'a> = match self.stdout.as_mut() {
            Some(file) => file,
            None => out,
        };
        let stderr: Sink<'a> = match self.stderr.as_mut() {
            Some(file) => file,
            None => err,
        };
        (stdout, stderr)
    }
}

fn open_or_report(
    target: &str,
    append: bool,
    cwd: &Path,
    diagnostics: &mut dyn Write,
) -> Option<File> {
    if target.is_empty() {
        return None;
    }

    match open_target(&cwd.join(target), append) {
        Ok(file) => Some(file),
        Err(err) => {
            warn!("redirection to {} failed: {}", target, err);
            // The diagnostic stream itself may be broken; nothing more to do then.
            let _ = writeln!(diagnostics, "Failed to open {}: {}", target, err);
            None
        }
    }
}

fn open_target(path: &Path, append: bool) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}
