//! Line sources for the interactive loop.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

/// Where command lines come from.
pub trait LineSource {
    /// Show `prompt` and read one line, without its line terminator.
    ///
    /// Returns `Ok(None)` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Line editor for an interactive terminal.
pub struct Terminal {
    editor: Editor<(), DefaultHistory>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                // Ctrl+C at the prompt only discards the current line
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Plain line reader for scripted (non-terminal) input.
///
/// Writes the prompt itself so transcripts match an interactive session.
pub struct Piped<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> Piped<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for Piped<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Pick the line source for the process's stdin.
pub fn stdin_source() -> Result<Box<dyn LineSource>> {
    if io::stdin().is_terminal() {
        Ok(Box::new(Terminal::new()?))
    } else {
        Ok(Box::new(Piped::new(io::stdin().lock(), io::stdout())))
    }
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        (**self).read_line(prompt)
    }
}
