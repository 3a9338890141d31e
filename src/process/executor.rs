use std::{
    collections::HashMap,
    io::{self, Read, Write},
    os::unix::process::CommandExt,
    path::Path,
    process::{Command, ExitStatus, Stdio},
    thread,
};

use log::{debug, warn};

use super::{output::Sink, signal::ForegroundChild, ProcessError};

/// Launches external programs with the shell's directory and environment.
#[derive(Debug, Clone, Copy)]
pub struct ProcessExecutor<'a> {
    cwd: &'a Path,
    env: &'a HashMap<String, String>,
}

impl<'a> ProcessExecutor<'a> {
    pub fn new(cwd: &'a Path, env: &'a HashMap<String, String>) -> Self {
        Self { cwd, env }
    }

    /// Runs `program` with `argv` and blocks until it exits. The child's
    /// stdout and stderr are copied into the given sinks by two threads, both
    /// joined before this returns.
    pub fn spawn_process(
        &self,
        program: &Path,
        argv: &[String],
        stdout: Sink<'_>,
        stderr: Sink<'_>,
    ) -> Result<ExitStatus, ProcessError> {
        let Some((name, args)) = argv.split_first() else {
            return Err(ProcessError::CommandNotFound(String::new()));
        };

        let mut command = Command::new(program);
        command
            .arg0(name)
            .args(args)
            .current_dir(self.cwd)
            .env_clear()
            .envs(self.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let _foreground = ForegroundChild::enter();
        let mut child = command.spawn().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ProcessError::CommandNotFound(name.clone())
            } else {
                ProcessError::Spawn {
                    name: name.clone(),
                    source,
                }
            }
        })?;
        debug!("spawned {} ({}) as pid {}", name, program.display(), child.id());

        let child_out = child.stdout.take();
        let child_err = child.stderr.take();

        let (out_task, err_task) = thread::scope(|scope| {
            let out_task = scope.spawn(move || drain(child_out, stdout));
            let err_task = scope.spawn(move || drain(child_err, stderr));
            (out_task.join(), err_task.join())
        });

        // Reap the child before reporting a drain failure.
        let status = child.wait()?;
        debug!("{} exited with {}", name, status);

        for task in [out_task, err_task] {
            task.map_err(|_| ProcessError::Drain(name.clone()))?;
        }
        Ok(status)
    }
}

/// Copies `source` into `sink` until EOF. When the sink fails, the rest of the
/// source is discarded so the child never blocks on a full pipe.
fn drain<R: Read>(source: Option<R>, sink: Sink<'_>) {
    let Some(mut source) = source else {
        return;
    };

    let copied = io::copy(&mut source, &mut *sink).and_then(|_| sink.flush());
    if let Err(err) = copied {
        warn!("dropping child output: {}", err);
        let _ = io::copy(&mut source, &mut io::sink());
    }
}
