//! Interactive read-query-print loop
//!
//! Reads one name per line, queries the matcher and prints the ranked
//! matches until the user types `quit` (any case) or input ends. A failed
//! query is reported and the loop keeps going; only terminal I/O errors end
//! it early.

use std::io::{self, BufRead, Write};

use tracing::error;

use crate::embed::Embedder;
use crate::search::NameMatcher;
use crate::store::VectorStore;

mod render;

pub use render::render_response;

pub const PROMPT: &str = "\nEnter a name to find matches (or 'quit' to exit): ";
pub const QUIT_COMMAND: &str = "quit";

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    AwaitingInput,
    Terminated,
}

/// Interactive shell over any line reader and writer.
pub struct Shell<R, W> {
    input: R,
    output: W,
    top_k: usize,
    state: ShellState,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, top_k: usize) -> Self {
        Self {
            input,
            output,
            top_k,
            state: ShellState::AwaitingInput,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    /// Print the banner and loop until terminated.
    pub fn run<E: Embedder, S: VectorStore>(
        &mut self,
        matcher: &mut NameMatcher<E, S>,
    ) -> io::Result<()> {
        writeln!(self.output, "Welcome to Name Matching System!")?;
        writeln!(self.output, "{}", "-".repeat(50))?;

        while self.state == ShellState::AwaitingInput {
            self.step(matcher)?;
        }
        self.output.flush()
    }

    /// Prompt once and handle one line of input.
    pub fn step<E: Embedder, S: VectorStore>(
        &mut self,
        matcher: &mut NameMatcher<E, S>,
    ) -> io::Result<ShellState> {
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            self.state = ShellState::Terminated;
            return Ok(self.state);
        }

        let name = line.trim();

        if name.eq_ignore_ascii_case(QUIT_COMMAND) {
            writeln!(self.output, "Thank you for using Name Matching System!")?;
            self.state = ShellState::Terminated;
            return Ok(self.state);
        }

        if name.is_empty() {
            writeln!(self.output, "Enter a valid name.")?;
            return Ok(self.state);
        }

        match matcher.query(name, self.top_k) {
            Ok(response) => render_response(&mut self.output, &response)?,
            Err(err) => {
                error!(input = name, error = %err, "query failed");
                writeln!(self.output, "Error: {err}")?;
            }
        }

        Ok(self.state)
    }

    /// Give back the writer, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.output
    }
}
