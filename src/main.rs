use std::io::{self, IsTerminal};

use clap::Parser;
use rsh::{
    error::ShellError,
    flags::Flags,
    input::RawMode,
    process::signal,
    shell::{Session, Shell},
};

fn main() {
    let flags = Flags::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(flags.log_filter()))
        .init();

    let status = match run(&flags) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("rsh: {}", e);
            1
        }
    };
    std::process::exit(status);
}

fn run(flags: &Flags) -> Result<i32, ShellError> {
    signal::install_interrupt_handler(flags.quiet)?;
    let session = Session::from_process()?;

    let mut shell = Shell::new(io::stdin(), session);
    if !flags.no_raw && io::stdin().is_terminal() {
        shell = shell.with_terminal(RawMode::enable()?);
    }

    // The shell, and with it the terminal guard, is dropped before returning.
    shell.run(&mut io::stdout(), &mut io::stderr())
}
