//! Line input for the read-eval loop.
//!
//! The loop only needs "give me the next line, or tell me input is over".
//! [`LineReader`] is that contract; it is implemented for the `rustyline`
//! editor used on terminals and for [`PlainReader`], which reads any
//! [`BufRead`] and is used for piped input and in tests.

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Source of command lines.
pub trait LineReader {
    /// Shows `prompt` and reads one line without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // in-memory only, dropped with the editor
                    self.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C at the prompt discards the line
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err).context("failed to read line"),
        }
    }
}

/// Reads lines from any buffered reader, writing the prompt to `prompt_out`.
pub struct PlainReader<R, W> {
    input: R,
    prompt_out: W,
    buf: Vec<u8>,
}

impl<R: BufRead, W: Write> PlainReader<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self {
            input,
            prompt_out,
            buf: Vec::new(),
        }
    }

    /// Gives back the prompt sink, e.g. to inspect what was written to it.
    pub fn into_prompt_out(self) -> W {
        self.prompt_out
    }
}

impl<R: BufRead, W: Write> LineReader for PlainReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        self.buf.clear();
        let n = self
            .input
            .read_until(b'\n', &mut self.buf)
            .context("failed to read line")?;
        if n == 0 {
            return Ok(None);
        }

        if self.buf.ends_with(b"\n") {
            self.buf.pop();
            if self.buf.ends_with(b"\r") {
                self.buf.pop();
            }
        }
        let line = match String::from_utf8(std::mem::take(&mut self.buf)) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("input line is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &[u8]) -> PlainReader<Cursor<Vec<u8>>, Vec<u8>> {
        PlainReader::new(Cursor::new(input.to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_lines_then_eof() {
        let mut r = reader(b"first\nsecond\r\n");
        assert_eq!(r.read_line("> ").unwrap().as_deref(), Some("first"));
        assert_eq!(r.read_line("> ").unwrap().as_deref(), Some("second"));
        assert_eq!(r.read_line("> ").unwrap(), None);
        assert_eq!(r.into_prompt_out(), b"> > > ");
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut r = reader(b"exit");
        assert_eq!(r.read_line("").unwrap().as_deref(), Some("exit"));
        assert_eq!(r.read_line("").unwrap(), None);
    }

    #[test]
    fn test_empty_line_is_not_eof() {
        let mut r = reader(b"\n");
        assert_eq!(r.read_line("").unwrap().as_deref(), Some(""));
        assert_eq!(r.read_line("").unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut r = reader(b"echo \xff\n");
        assert_eq!(
            r.read_line("").unwrap().as_deref(),
            Some("echo \u{fffd}")
        );
    }
}
