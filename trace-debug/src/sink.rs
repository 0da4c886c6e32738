//! Output channels
//!
//! The sink owns the two long-lived output channels and serializes writes:
//!
//! ```text
//! write(Primary, text)   ──► Mutex ──► stderr   (write_all + flush)
//! write(Secondary, text) ──► Mutex ──► stdout   (write_all + flush)
//! ```
//!
//! Each record goes out as one `write_all` under its channel's lock, so two
//! records on the same channel never interleave. The two channels are
//! independent of each other.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, TraceError};
use crate::record::Destination;

/// One locked output stream
pub struct Channel {
    name: &'static str,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Channel {
    /// Wrap a writer
    pub fn new<W>(name: &'static str, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            name,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write `text` plus a line terminator, then flush
    pub fn write_line(&self, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');

        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| TraceError::Io {
                channel: self.name,
                source,
            })
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("writer", &"<writer>")
            .finish()
    }
}

/// The primary and secondary output channels
#[derive(Debug)]
pub struct Sink {
    primary: Channel,
    secondary: Channel,
}

impl Sink {
    /// Primary → stderr, secondary → stdout
    pub fn stdio() -> Self {
        Self::new(io::stderr(), io::stdout())
    }

    /// Build a sink over any pair of writers
    pub fn new<P, S>(primary: P, secondary: S) -> Self
    where
        P: Write + Send + 'static,
        S: Write + Send + 'static,
    {
        Self {
            primary: Channel::new(Destination::Primary.as_str(), primary),
            secondary: Channel::new(Destination::Secondary.as_str(), secondary),
        }
    }

    /// A sink writing into two memory buffers, returned alongside it
    pub fn in_memory() -> (Self, MemoryWriter, MemoryWriter) {
        let primary = MemoryWriter::new();
        let secondary = MemoryWriter::new();
        (Self::new(primary.clone(), secondary.clone()), primary, secondary)
    }

    /// Write one record's text to the chosen channel
    pub fn write(&self, destination: Destination, text: &str) -> Result<()> {
        self.channel(destination).write_line(text)
    }

    fn channel(&self, destination: Destination) -> &Channel {
        match destination {
            Destination::Primary => &self.primary,
            Destination::Secondary => &self.secondary,
        }
    }
}

/// In-memory writer for testing
///
/// Clones share the same buffer, so a test can keep one handle while the
/// sink owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// True if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Drop everything written so far
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
