//! Line-oriented console the evaluator reads from and writes to.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// The evaluator's only I/O boundary.
pub trait Console {
    /// Write one line of output.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Read one line without its line terminator. `Ok(None)` means end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Standard Streams
// ══════════════════════════════════════════════════════════════════════════════

/// Console over the process's stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        strip_line_ending(&mut buf);
        Ok(Some(buf))
    }
}

fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Buffered
// ══════════════════════════════════════════════════════════════════════════════

/// Console with scripted input and captured output.
#[derive(Debug, Clone, Default)]
pub struct BufferedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl BufferedConsole {
    /// Create a console that answers reads with `inputs`, in order.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Lines written so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    /// Input lines not yet consumed.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for BufferedConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }
}
