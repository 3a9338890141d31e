use std::io::{self, Write};
use std::path::Path;

use crate::path::PathIndex;

/// Names handled inside the shell process.
pub const BUILTINS: [&str; 6] = ["cd", "echo", "exit", "kill", "pwd", "type"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.iter().any(|builtin| builtin.eq_ignore_ascii_case(name))
}

pub fn echo(text: &str, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", text)
}

pub fn print_working_directory(dir: &Path, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", dir.display())
}

pub fn type_query(target: Option<&str>, index: &PathIndex, out: &mut dyn Write) -> io::Result<()> {
    let Some(target) = target else {
        return writeln!(out, "type: missing argument");
    };

    if is_builtin(target) {
        writeln!(out, "{} is a shell builtin", target)
    } else if let Some(path) = index.get(target) {
        writeln!(out, "{} is {}", target, path.display())
    } else {
        writeln!(out, "{}: not found", target)
    }
}

/// Status the shell should exit with. A non-numeric argument is reported and
/// mapped to 2.
pub fn exit_status(arg: Option<&str>, err: &mut dyn Write) -> io::Result<i32> {
    let Some(arg) = arg else {
        return Ok(0);
    };

    match arg.parse::<i32>() {
        Ok(code) => Ok(code & 0xff),
        Err(_) => {
            writeln!(err, "exit: {}: numeric argument required", arg)?;
            Ok(2)
        }
    }
}
