use crate::input::TerminalError;
use crate::process::ProcessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Terminal error: {0}")]
    Terminal(#[from] TerminalError),
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
    #[error("Ctrl-C error: {0}")]
    CtrlC(#[from] ctrlc::Error),
}
