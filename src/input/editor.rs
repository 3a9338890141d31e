use std::{
    io::{self, Read, Write},
    time::{Duration, Instant},
};

use log::trace;

use super::completer::{self, CommandSource, WordContext};

const TAB: u8 = 0x09;
const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const END_OF_TRANSMISSION: u8 = 0x04;
const ESCAPE: u8 = 0x1b;

const BELL: &[u8] = b"\x07";
const ERASE_CHAR: &[u8] = b"\x08 \x08";
const CLEAR_LINE: &[u8] = b"\r\x1b[K";

/// Two tabs on the same input within this window list every candidate.
pub const DOUBLE_TAB_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A submitted line with trailing whitespace removed.
    Line(String),
    /// Input ended; carries whatever was typed on the unfinished line.
    Eof(String),
}

#[derive(Debug, Clone)]
struct TabPress {
    at: Instant,
    input: String,
}

/// Reads raw bytes, echoes them, and keeps the edit buffer and cursor.
pub struct LineEditor<R: Read> {
    input: R,
    buffer: Vec<char>,
    cursor: usize,
    last_tab: Option<TabPress>,
    /// A byte read ahead that turned out to start the next input unit.
    pending: Option<u8>,
}

impl<R: Read> LineEditor<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buffer: Vec::new(),
            cursor: 0,
            last_tab: None,
            pending: None,
        }
    }

    /// Prints `prompt` and edits one line until Enter or end of input.
    pub fn read_line(
        &mut self,
        prompt: &str,
        source: &dyn CommandSource,
        out: &mut dyn Write,
    ) -> io::Result<ReadOutcome> {
        self.reset();
        out.write_all(prompt.as_bytes())?;
        out.flush()?;

        loop {
            let Some(byte) = self.next_byte()? else {
                return Ok(ReadOutcome::Eof(self.take_line()));
            };

            match byte {
                TAB => self.complete(prompt, source, out)?,
                LINE_FEED | CARRIAGE_RETURN => {
                    let line = self.take_line().trim_end().to_string();
                    out.write_all(b"\n")?;
                    out.flush()?;
                    trace!("read line {:?}", line);
                    return Ok(ReadOutcome::Line(line));
                }
                BACKSPACE | DELETE => self.backspace(out)?,
                END_OF_TRANSMISSION if self.buffer.is_empty() => {
                    return Ok(ReadOutcome::Eof(String::new()));
                }
                ESCAPE => self.skip_escape_sequence()?,
                byte if byte < 0x20 => {}
                byte => {
                    if let Some(c) = self.decode(byte)? {
                        if !c.is_control() {
                            self.insert(c, out)?;
                        }
                    }
                }
            }
        }
    }

    pub fn buffer(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn take_line(&mut self) -> String {
        let line = self.buffer();
        self.reset();
        line
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Assembles a UTF-8 character from `lead` and its continuation bytes. A
    /// byte that is not a continuation ends the sequence and is handled as
    /// the next key.
    fn decode(&mut self, lead: u8) -> io::Result<Option<char>> {
        let width = match lead {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(None),
        };

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(byte @ 0x80..=0xbf) => *slot = byte,
                Some(byte) => {
                    trace!("dropping truncated UTF-8 sequence from {:#04x}", lead);
                    self.pending = Some(byte);
                    return Ok(None);
                }
                None => return Ok(None),
            }
        }
        Ok(std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next()))
    }

    /// Swallows CSI (`ESC [ ... final`) and SS3 (`ESC O x`) sequences such as
    /// arrow keys. Any other byte after a lone escape is kept as the next key.
    fn skip_escape_sequence(&mut self) -> io::Result<()> {
        match self.next_byte()? {
            Some(b'[') => {
                while let Some(byte) = self.next_byte()? {
                    if (0x40..=0x7e).contains(&byte) {
                        break;
                    }
                }
            }
            Some(b'O') => {
                self.next_byte()?;
            }
            Some(byte) => self.pending = Some(byte),
            None => {}
        }
        Ok(())
    }

    fn insert(&mut self, c: char, out: &mut dyn Write) -> io::Result<()> {
        self.buffer.insert(self.cursor, c);
        self.cursor += 1;

        let mut echo = [0u8; 4];
        out.write_all(c.encode_utf8(&mut echo).as_bytes())?;
        out.flush()
    }

    fn backspace(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if self.cursor == 0 {
            return Ok(());
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);

        out.write_all(ERASE_CHAR)?;
        out.flush()
    }

    fn set_buffer(&mut self, text: &str) {
        self.buffer = text.chars().collect();
        self.cursor = self.buffer.len();
    }

    fn redraw(&self, prompt: &str, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(CLEAR_LINE)?;
        out.write_all(prompt.as_bytes())?;
        out.write_all(self.buffer().as_bytes())
    }

    fn is_double_tab(&self, input: &str) -> bool {
        self.last_tab
            .as_ref()
            .is_some_and(|tab| tab.at.elapsed() < DOUBLE_TAB_WINDOW && tab.input == input)
    }

    fn record_tab(&mut self) {
        self.last_tab = Some(TabPress {
            at: Instant::now(),
            input: self.buffer(),
        });
    }

    fn complete(
        &mut self,
        prompt: &str,
        source: &dyn CommandSource,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let input = self.buffer();
        if self.cursor != self.buffer.len() || input.trim_end().is_empty() {
            return Ok(());
        }

        let context = WordContext::from_input(&input);
        let candidates = completer::candidates(&context.current, source);
        trace!("completing {:?}: {:?}", context.current, candidates);

        match candidates.as_slice() {
            [] => {
                if !context.current.is_empty() && !input.ends_with(' ') {
                    out.write_all(BELL)?;
                }
            }
            [single] => {
                let mut completed = format!("{}{}", context.prefix, single);
                if !completed.ends_with(' ') {
                    completed.push(' ');
                }
                self.set_buffer(&completed);
                self.redraw(prompt, out)?;
                self.record_tab();
            }
            _ => {
                let common = completer::longest_common_prefix(&candidates);
                if self.is_double_tab(&input) {
                    write!(out, "\n{}\n", candidates.join("  "))?;
                    out.write_all(prompt.as_bytes())?;
                    out.write_all(input.as_bytes())?;
                } else if common.len() > context.current.len() {
                    self.set_buffer(&format!("{}{}", context.prefix, common));
                    self.redraw(prompt, out)?;
                } else {
                    out.write_all(BELL)?;
                }
                self.record_tab();
            }
        }
        out.flush()
    }
}
