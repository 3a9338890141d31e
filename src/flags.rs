use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "rsh", version, about = "A small interactive shell")]
pub struct Flags {
    /// Suppress shell-level notices such as the Ctrl-C hint
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Leave the terminal mode alone even when stdin is a TTY
    #[arg(long)]
    pub no_raw: bool,
}

impl Flags {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}
