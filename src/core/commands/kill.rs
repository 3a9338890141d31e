use std::io::{self, Write};

use log::debug;

use crate::process::signal;

/// Sends SIGTERM to the process named by `pid`. Every failure is reported on
/// `err`; non-positive ids are rejected since they address process groups.
pub fn kill(pid: Option<&str>, err: &mut dyn Write) -> io::Result<()> {
    let Some(raw) = pid else {
        return writeln!(err, "kill: missing argument");
    };

    let pid = match raw.parse::<i32>() {
        Ok(pid) if pid > 0 => pid,
        _ => return writeln!(err, "kill: {}: Invalid PID", raw),
    };

    match signal::terminate(pid) {
        Ok(()) => {
            debug!("sent SIGTERM to {}", pid);
            Ok(())
        }
        Err(e) => writeln!(err, "kill: {}", e),
    }
}
