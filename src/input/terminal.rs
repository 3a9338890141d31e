use std::{
    io,
    mem::MaybeUninit,
    os::unix::io::{AsRawFd, RawFd},
};

use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("failed to read terminal attributes: {0}")]
    GetAttr(io::Error),
    #[error("failed to set terminal attributes: {0}")]
    SetAttr(io::Error),
}

fn get_attrs(fd: RawFd) -> Result<libc::termios, TerminalError> {
    let mut termios = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: tcgetattr fully initializes the struct when it returns 0.
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(TerminalError::GetAttr(io::Error::last_os_error()));
    }
    Ok(unsafe { termios.assume_init() })
}

fn set_attrs(fd: RawFd, termios: &libc::termios) -> Result<(), TerminalError> {
    // SAFETY: `termios` is a valid, initialized struct.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) } != 0 {
        return Err(TerminalError::SetAttr(io::Error::last_os_error()));
    }
    Ok(())
}

/// Puts stdin into non-canonical, no-echo mode for as long as the value lives.
///
/// Signals and output processing stay enabled, so Ctrl-C still reaches the
/// foreground child and `\n` still moves to the start of the next line.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
    raw: libc::termios,
}

impl RawMode {
    pub fn enable() -> Result<Self, TerminalError> {
        let fd = io::stdin().as_raw_fd();
        let original = get_attrs(fd)?;

        let mut raw = original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_attrs(fd, &raw)?;

        debug!("terminal switched to raw mode");
        Ok(Self { fd, original, raw })
    }

    /// Restores the original mode until the returned guard is dropped.
    pub fn suspend(&self) -> Result<CookedGuard<'_>, TerminalError> {
        set_attrs(self.fd, &self.original)?;
        debug!("terminal restored for child process");
        Ok(CookedGuard { mode: self })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        match set_attrs(self.fd, &self.original) {
            Ok(()) => debug!("terminal mode restored"),
            Err(e) => warn!("{}", e),
        }
    }
}

pub struct CookedGuard<'a> {
    mode: &'a RawMode,
}

impl Drop for CookedGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = set_attrs(self.mode.fd, &self.mode.raw) {
            warn!("{}", e);
        }
    }
}
