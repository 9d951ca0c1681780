//! Line-based prompting over any reader/writer pair.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;

use gradebook_core::model::{Subject, MAX_MARK};

/// Operator console. End of input is reported as `None` from the prompt
/// methods so callers can wind down cleanly.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line, without its line ending.
    pub fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask for one subject's mark until a whole number in range is given.
    pub fn prompt_mark(&mut self, subject: Subject) -> Result<Option<u8>> {
        loop {
            let label = format!("  {:<12} (0-{MAX_MARK}): ", subject.name());
            let Some(raw) = self.prompt(&label)? else {
                return Ok(None);
            };
            match raw.trim().parse::<u8>() {
                Ok(mark) if mark <= MAX_MARK => return Ok(Some(mark)),
                _ => self.line(format!(
                    "  Enter a whole number between 0 and {MAX_MARK}."
                ))?,
            }
        }
    }

    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
