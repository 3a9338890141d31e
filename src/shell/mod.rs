use std::io::{Read, Write};

use log::debug;

mod executor;
mod session;

pub use session::Session;

use crate::{
    core::commands::Flow,
    error::ShellError,
    input::{LineEditor, RawMode, ReadOutcome},
    process::output::Sink,
};

use executor::CommandHandler;

pub const PROMPT: &str = "$ ";

pub struct Shell<R: Read> {
    pub(crate) editor: LineEditor<R>,
    pub(crate) session: Session,
    pub(crate) terminal: Option<RawMode>,
}

impl<R: Read> Shell<R> {
    pub fn new(input: R, session: Session) -> Self {
        Shell {
            editor: LineEditor::new(input),
            session,
            terminal: None,
        }
    }

    /// Hands the raw-mode guard to the shell so it can step out of raw mode
    /// while a child runs. The terminal is restored when the shell is dropped.
    pub fn with_terminal(mut self, terminal: RawMode) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `exit` or end of input and returns the exit status. Errors
    /// from a single line are printed and the loop carries on; only a failure
    /// to read input ends it early.
    pub fn run(&mut self, out: Sink<'_>, err: Sink<'_>) -> Result<i32, ShellError> {
        loop {
            let line = match self.editor.read_line(PROMPT, &self.session, &mut *out)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof(partial) => {
                    debug!("end of input, discarding {:?}", partial);
                    out.write_all(b"\n")?;
                    out.flush()?;
                    return Ok(0);
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match self.execute_command(&line, &mut *out, &mut *err) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit(status)) => {
                    debug!("exit with status {}", status);
                    return Ok(status);
                }
                Err(e) => {
                    writeln!(err, "Error: {}", e)?;
                    err.flush()?;
                }
            }
        }
    }
}
