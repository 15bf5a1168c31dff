use super::SemanticError;
use std::fmt;
use std::io;

/// A semantic error tagged with the name of the scope it was found in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub scope: String,
    pub error: SemanticError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.error)
    }
}

/// Receiver of diagnostics, fed in traversal order as soon as each error is found.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Writes one line per diagnostic. The first write failure is kept for [`WriterSink::finish`].
pub struct WriterSink<W: io::Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    pub fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

impl<W: io::Write> DiagnosticSink for WriterSink<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.writer, "{diagnostic}") {
            self.error = Some(err);
        }
    }
}
