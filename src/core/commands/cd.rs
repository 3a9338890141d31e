use std::io::Write;

use log::debug;

use crate::{error::ShellError, path::PathExpander, shell::Session};

/// Moves the session to `target`. No argument and `~` both mean HOME.
pub fn change_directory(
    session: &mut Session,
    target: Option<&str>,
    err: &mut dyn Write,
) -> Result<(), ShellError> {
    let arg = target.unwrap_or("~");
    let expander = PathExpander::new(session.home());

    let resolved = match expander.resolve(session.current_dir(), arg) {
        Ok(resolved) => resolved,
        Err(ShellError::HomeDirNotFound) => {
            writeln!(err, "cd: HOME not set")?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if resolved.is_dir() {
        debug!("cd {} -> {}", arg, resolved.display());
        session.set_current_dir(resolved);
    } else {
        writeln!(err, "cd: {}: No such file or directory", arg)?;
    }
    Ok(())
}
