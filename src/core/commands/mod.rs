use std::io::Write;
use std::path::PathBuf;

use log::debug;

mod builtin;
mod cd;
mod kill;

pub use builtin::{is_builtin, BUILTINS};

use crate::{
    error::ShellError,
    parser::Redirections,
    path::PathIndex,
    process::{output::Sink, OutputTargets, ProcessError, ProcessExecutor},
    shell::Session,
};

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Optional raw status argument.
    Exit(Option<String>),
    ChangeDirectory(Option<String>),
    PrintWorkingDirectory,
    TypeQuery(Option<String>),
    Echo(String),
    Kill(Option<String>),
    /// Full argument vector; the first word names an indexed executable.
    External(Vec<String>),
    Unknown(String),
}

impl Command {
    /// Maps the first word to a builtin or an indexed executable. Returns
    /// `None` for an empty word list.
    pub fn classify(words: &[String], index: &PathIndex) -> Option<Self> {
        let (first, rest) = words.split_first()?;
        let arg = || rest.first().cloned();

        let command = match first.as_str() {
            "exit" => Command::Exit(arg()),
            "cd" => Command::ChangeDirectory(arg()),
            "pwd" => Command::PrintWorkingDirectory,
            "type" => Command::TypeQuery(arg()),
            "echo" => Command::Echo(rest.join(" ")),
            "kill" => Command::Kill(arg()),
            name if index.contains(name) => Command::External(words.to_vec()),
            name => Command::Unknown(name.to_string()),
        };
        debug!("classified {:?}", command);
        Some(command)
    }
}

/// What the loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Runs classified commands against the session.
pub struct CommandExecutor<'s> {
    session: &'s mut Session,
    index: &'s PathIndex,
}

impl<'s> CommandExecutor<'s> {
    pub fn new(session: &'s mut Session, index: &'s PathIndex) -> Self {
        Self { session, index }
    }

    /// Opens the redirection targets, runs `command` and closes the targets
    /// again on every path out. `out` and `err` are the terminal streams.
    pub fn execute(
        &mut self,
        command: &Command,
        redirections: &Redirections,
        out: Sink<'_>,
        err: Sink<'_>,
    ) -> Result<Flow, ShellError> {
        let mut targets = OutputTargets::open(redirections, self.session.current_dir(), &mut *err);
        let (stdout, stderr) = targets.writers(out, err);

        let flow = self.dispatch(command, &mut *stdout, &mut *stderr);
        stdout.flush()?;
        stderr.flush()?;
        flow
    }

    fn dispatch(
        &mut self,
        command: &Command,
        stdout: Sink<'_>,
        stderr: Sink<'_>,
    ) -> Result<Flow, ShellError> {
        match command {
            Command::Exit(arg) => {
                return Ok(Flow::Exit(builtin::exit_status(arg.as_deref(), stderr)?));
            }
            Command::ChangeDirectory(target) => {
                cd::change_directory(self.session, target.as_deref(), stderr)?
            }
            Command::PrintWorkingDirectory => {
                builtin::print_working_directory(self.session.current_dir(), stdout)?
            }
            Command::TypeQuery(target) => builtin::type_query(target.as_deref(), self.index, stdout)?,
            Command::Echo(text) => builtin::echo(text, stdout)?,
            Command::Kill(pid) => kill::kill(pid.as_deref(), stderr)?,
            Command::External(argv) => self.run_external(argv, stdout, stderr)?,
            Command::Unknown(text) => writeln!(stderr, "{}: command not found", text)?,
        }
        Ok(Flow::Continue)
    }

    fn run_external(
        &self,
        argv: &[String],
        stdout: Sink<'_>,
        stderr: Sink<'_>,
    ) -> Result<(), ShellError> {
        let Some(name) = argv.first() else {
            return Ok(());
        };
        let program = self
            .index
            .get(name)
            .map(|path| path.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(name));

        let executor = ProcessExecutor::new(self.session.current_dir(), self.session.env());
        match executor.spawn_process(&program, argv, &mut *stdout, &mut *stderr) {
            Ok(_) => Ok(()),
            Err(e @ (ProcessError::CommandNotFound(_) | ProcessError::Spawn { .. })) => {
                writeln!(stderr, "{}", e)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn words(line: &str) -> Vec<String> {
        crate::parser::split_words(line)
    }

    fn ls_index() -> PathIndex {
        vec![("ls".to_string(), PathBuf::from("/bin/ls"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_classify_builtins() {
        let index = PathIndex::default();
        assert_eq!(
            Command::classify(&words("exit"), &index),
            Some(Command::Exit(None))
        );
        assert_eq!(
            Command::classify(&words("cd /tmp extra"), &index),
            Some(Command::ChangeDirectory(Some("/tmp".to_string())))
        );
        assert_eq!(
            Command::classify(&words("pwd -L"), &index),
            Some(Command::PrintWorkingDirectory)
        );
        assert_eq!(
            Command::classify(&words("type"), &index),
            Some(Command::TypeQuery(None))
        );
        assert_eq!(
            Command::classify(&words("echo  'a   b'   c"), &index),
            Some(Command::Echo("a   b c".to_string()))
        );
        assert_eq!(
            Command::classify(&words("kill 42"), &index),
            Some(Command::Kill(Some("42".to_string())))
        );
    }

    #[test]
    fn test_classify_external_and_unknown() {
        let index = ls_index();
        assert_eq!(
            Command::classify(&words("ls -la /"), &index),
            Some(Command::External(words("ls -la /")))
        );
        assert_eq!(
            Command::classify(&words("frobnicate now"), &PathIndex::default()),
            Some(Command::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(Command::classify(&[], &PathIndex::default()), None);
    }

    fn session(dir: &Path) -> Session {
        let env: HashMap<String, String> = std::env::vars().collect();
        Session::new(dir.to_path_buf(), env)
    }

    fn run(
        session: &mut Session,
        index: &PathIndex,
        command: Command,
        redirections: Redirections,
    ) -> (Flow, String, String) {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let flow = CommandExecutor::new(session, index)
            .execute(&command, &redirections, &mut out, &mut err)
            .unwrap();
        (
            flow,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_unknown_command_message() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let (flow, out, err) = run(
            &mut session,
            &PathIndex::default(),
            Command::Unknown("frobnicate".to_string()),
            Redirections::default(),
        );
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert_eq!(err, "frobnicate: command not found\n");
    }

    #[test]
    fn test_echo_redirected_to_fresh_file() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let redirections = Redirections {
            stdout: Some("out/hello.txt".to_string()),
            ..Default::default()
        };
        let (_, out, _) = run(
            &mut session,
            &PathIndex::default(),
            Command::Echo("Hello World".to_string()),
            redirections,
        );
        assert!(out.is_empty());
        let written = fs::read_to_string(dir.path().join("out/hello.txt")).unwrap();
        assert_eq!(written, "Hello World\n");
    }

    #[test]
    fn test_cd_then_pwd() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        let mut session = session(dir.path());
        let index = PathIndex::default();

        run(
            &mut session,
            &index,
            Command::ChangeDirectory(Some("inner/../inner".to_string())),
            Redirections::default(),
        );
        let (_, out, _) = run(
            &mut session,
            &index,
            Command::PrintWorkingDirectory,
            Redirections::default(),
        );
        assert_eq!(out, format!("{}\n", dir.path().join("inner").display()));
    }

    #[test]
    fn test_exit_flow() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let (flow, _, _) = run(
            &mut session,
            &PathIndex::default(),
            Command::Exit(Some("7".to_string())),
            Redirections::default(),
        );
        assert_eq!(flow, Flow::Exit(7));
    }

    #[test]
    fn test_external_stderr_redirect() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let index = PathIndex::load(session.var("PATH").unwrap_or_default());
        let redirections = Redirections {
            stderr: Some("err.log".to_string()),
            ..Default::default()
        };
        let argv = words("sh -c 'echo visible; echo hidden 1>&2'");
        let (_, out, err) = run(&mut session, &index, Command::External(argv), redirections);

        assert_eq!(out, "visible\n");
        assert!(err.is_empty());
        let logged = fs::read_to_string(dir.path().join("err.log")).unwrap();
        assert_eq!(logged, "hidden\n");
    }

    #[test]
    fn test_external_vanished_binary() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let index: PathIndex = vec![("ghost".to_string(), dir.path().join("ghost"))]
            .into_iter()
            .collect();
        let (flow, _, err) = run(
            &mut session,
            &index,
            Command::External(vec!["ghost".to_string()]),
            Redirections::default(),
        );
        assert_eq!(flow, Flow::Continue);
        assert_eq!(err, "ghost: command not found\n");
    }
}
