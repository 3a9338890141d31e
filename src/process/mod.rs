use thiserror::Error;

pub mod executor;
pub mod output;
pub mod signal;

pub use executor::ProcessExecutor;
pub use output::OutputTargets;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{0}: command not found")]
    CommandNotFound(String),
    #[error("{name}: {source}")]
    Spawn {
        name: String,
        source: std::io::Error,
    },
    #[error("{0}: No such process")]
    NoSuchProcess(i32),
    #[error("{pid}: {source}")]
    Signal { pid: i32, source: std::io::Error },
    #[error("output drain panicked for {0}")]
    Drain(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
