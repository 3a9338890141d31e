use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::ProcessError;

static FOREGROUND_CHILDREN: AtomicUsize = AtomicUsize::new(0);

/// Keeps SIGINT from killing the shell. The foreground child still receives
/// the signal from the terminal and terminates by default; the hint is only
/// printed while the shell itself is waiting at the prompt.
pub fn install_interrupt_handler(quiet: bool) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if should_print_hint(quiet, foreground_child_running()) {
            println!("\nUse 'exit' to exit the shell");
        }
    })
}

fn should_print_hint(quiet: bool, child_running: bool) -> bool {
    !quiet && !child_running
}

pub fn foreground_child_running() -> bool {
    FOREGROUND_CHILDREN.load(Ordering::SeqCst) > 0
}

/// Marks a child as owning the terminal until dropped.
#[derive(Debug)]
pub struct ForegroundChild {
    _private: (),
}

impl ForegroundChild {
    pub fn enter() -> Self {
        FOREGROUND_CHILDREN.fetch_add(1, Ordering::SeqCst);
        Self { _private: () }
    }
}

impl Drop for ForegroundChild {
    fn drop(&mut self) {
        FOREGROUND_CHILDREN.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Sends SIGTERM to `pid`.
pub fn terminate(pid: i32) -> Result<(), ProcessError> {
    // SAFETY: kill(2) has no memory-safety preconditions.
    if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
        return Ok(());
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(ProcessError::NoSuchProcess(pid)),
        _ => Err(ProcessError::Signal { pid, source: err }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_terminate_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        terminate(child.id() as i32).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_hint_only_at_prompt() {
        assert!(should_print_hint(false, false));
        assert!(!should_print_hint(false, true));
        assert!(!should_print_hint(true, false));
    }

    #[test]
    fn test_foreground_child_marker() {
        let _child = ForegroundChild::enter();
        assert!(foreground_child_running());
    }

    #[test]
    fn test_terminate_missing_process() {
        // pid_max on Linux never reaches this value
        let result = terminate(i32::MAX);
        assert!(matches!(result, Err(ProcessError::NoSuchProcess(_))));
    }
}
