use std::io::Read;

use crate::{
    core::commands::{Command, CommandExecutor, Flow},
    error::ShellError,
    parser,
    process::output::Sink,
};

pub(crate) trait CommandHandler {
    fn execute_command(&mut self, line: &str, out: Sink<'_>, err: Sink<'_>)
        -> Result<Flow, ShellError>;
}

impl<R: Read> CommandHandler for super::Shell<R> {
    fn execute_command(
        &mut self,
        line: &str,
        out: Sink<'_>,
        err: Sink<'_>,
    ) -> Result<Flow, ShellError> {
        // PATH is rescanned for every line so new executables show up at once.
        let index = self.session.path_index();
        let parsed = parser::parse_line(line);

        let Some(command) = Command::classify(&parsed.words, &index) else {
            return Ok(Flow::Continue);
        };

        let _cooked = match (&command, &self.terminal) {
            (Command::External(_), Some(terminal)) => Some(terminal.suspend()?),
            _ => None,
        };

        CommandExecutor::new(&mut self.session, &index).execute(
            &command,
            &parsed.redirections,
            out,
            err,
        )
    }
}
