//! The writer sink (spec.md §6 "Writer").
//!
//! The library writer never touches a file handle directly — it pushes
//! rendered lines through a `Writer` sink, so the frontend controls
//! whether output lands on disk, in memory (for golden tests), or
//! somewhere else entirely.

use std::io::{self, Write as IoWrite};

/// Receives emitted header text, one logical line at a time.
///
/// Implementations decide indentation and line-wrapping; the writer
/// passes already-assembled declaration text and leaves formatting
/// policy (spec.md §1 Non-goals: "output serialization's byte-level
/// formatting policy" is an external collaborator's job) to the sink.
pub trait Writer {
    fn write_line(&mut self, indent: usize, text: &str) -> io::Result<()>;

    fn blank_line(&mut self) -> io::Result<()> {
        self.write_line(0, "")
    }
}

/// Writes indented, human-readable text — one level is two spaces.
pub struct PrettyWriter<W: IoWrite> {
    inner: W,
}

impl<W: IoWrite> PrettyWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: IoWrite> Writer for PrettyWriter<W> {
    fn write_line(&mut self, indent: usize, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return writeln!(self.inner);
        }
        writeln!(self.inner, "{}{}", "  ".repeat(indent), text)
    }
}

/// Writes without indentation, one declaration per line, for when output
/// size rather than readability is the priority.
pub struct CompactWriter<W: IoWrite> {
    inner: W,
}

impl<W: IoWrite> CompactWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: IoWrite> Writer for CompactWriter<W> {
    fn write_line(&mut self, _indent: usize, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        writeln!(self.inner, "{text}")
    }
}

/// An in-memory sink, used by tests and by frontends that post-process
/// emitted text before writing it anywhere.
#[derive(Debug, Default)]
pub struct StringWriter {
    pretty: bool,
    buf: String,
}

impl StringWriter {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            buf: String::new(),
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl Writer for StringWriter {
    fn write_line(&mut self, indent: usize, text: &str) -> io::Result<()> {
        if text.is_empty() {
            self.buf.push('\n');
            return Ok(());
        }
        if self.pretty {
            self.buf.push_str(&"  ".repeat(indent));
        }
        self.buf.push_str(text);
        self.buf.push('\n');
        Ok(())
    }
}
