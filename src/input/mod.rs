pub mod completer;
mod editor;
mod terminal;

pub use completer::CommandSource;
pub use editor::{LineEditor, ReadOutcome, DOUBLE_TAB_WINDOW};
pub use terminal::{CookedGuard, RawMode, TerminalError};
