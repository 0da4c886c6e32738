//! Trace records
//!
//! A `TraceRecord` is built per call, handed to the formatter and sink, then
//! dropped. Nothing here is persisted.

use std::fmt;
use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which output channel receives a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Error-oriented stream (stderr)
    Primary,
    /// Output-oriented stream (stdout)
    Secondary,
}

impl Destination {
    /// Channel name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Primary => "primary",
            Destination::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Plain trace output
    Info,
    /// A check or assert whose condition fired
    Failure,
}

/// One call-frame descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Demangled function name, when symbols are available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Source column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Frame {
    /// Build a frame from a `#[track_caller]` location
    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            function: None,
            file: Some(location.file().to_string()),
            line: Some(location.line()),
            column: Some(location.column()),
        }
    }

    /// A frame that only carries a label, used by canned frame sources
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            function: Some(label.into()),
            file: None,
            line: None,
            column: None,
        }
    }

    /// True if this frame is the call site described by `location`.
    ///
    /// Resolved symbol paths are usually absolute while `Location::file` is
    /// relative to the build root, so files match on trailing components.
    pub fn is_call_site(&self, location: &Location<'_>) -> bool {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => {
                line == location.line() && Path::new(file).ends_with(location.file())
            }
            _ => false,
        }
    }

    /// Human-readable label for this frame
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.function, &self.file, self.line) {
            (Some(function), Some(file), Some(line)) => write!(f, "{} ({}:{})", function, file, line),
            (Some(function), _, _) => f.write_str(function),
            (None, Some(file), Some(line)) => match self.column {
                Some(column) => write!(f, "{}:{}:{}", file, line, column),
                None => write!(f, "{}:{}", file, line),
            },
            (None, Some(file), None) => f.write_str(file),
            (None, None, _) => f.write_str("<unknown>"),
        }
    }
}

/// Rendered sub-range of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceDump {
    /// Requested start index
    pub start: usize,
    /// Requested end index (exclusive)
    pub end: usize,
    /// `end - start` as requested, before clamping; zero for inverted ranges
    pub count: usize,
    /// Elements of the clamped range, in order
    pub elements: Vec<String>,
}

impl SliceDump {
    /// Render `sequence[start..end]`, clamped to the sequence bounds.
    ///
    /// Never panics: an out-of-range end is cut to the length and an
    /// inverted range yields no elements.
    pub fn new<T: fmt::Display>(sequence: &[T], start: usize, end: usize) -> Self {
        let len = sequence.len();
        let lo = start.min(len);
        let hi = end.min(len).max(lo);

        Self {
            start,
            end,
            count: end.saturating_sub(start),
            elements: sequence[lo..hi].iter().map(|e| e.to_string()).collect(),
        }
    }

    /// True if clamping dropped part of the requested range
    pub fn was_clamped(&self) -> bool {
        self.elements.len() != self.count
    }
}

/// A single trace, check or assert emission
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    /// Text supplied by the caller
    pub message: String,
    /// Channel that receives the record
    pub destination: Destination,
    /// Info for traces, Failure for fired checks/asserts
    pub severity: Severity,
    /// Number of frames that were requested
    pub context_depth: usize,
    /// Captured frames, nearest caller first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_frames: Vec<Frame>,
    /// Present for array traces only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_dump: Option<SliceDump>,
    /// Name of the calling thread
    pub thread: String,
    /// When the record was built
    pub timestamp: DateTime<Utc>,
}

impl TraceRecord {
    /// Create a record on the current thread with no frames attached
    pub fn new(destination: Destination, severity: Severity, message: impl Into<String>) -> Self {
        let thread = std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();

        Self {
            message: message.into(),
            destination,
            severity,
            context_depth: 0,
            context_frames: Vec::new(),
            slice_dump: None,
            thread,
            timestamp: Utc::now(),
        }
    }

    /// Attach captured frames; extra frames beyond `depth` are dropped
    pub fn with_frames(mut self, depth: usize, mut frames: Vec<Frame>) -> Self {
        frames.truncate(depth);
        self.context_depth = depth;
        self.context_frames = frames;
        self
    }

    /// Attach a sequence dump
    pub fn with_slice(mut self, dump: SliceDump) -> Self {
        self.slice_dump = Some(dump);
        self
    }

    /// Override the thread name (used by tests for stable output)
    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = thread.into();
        self
    }

    /// True if this record reports a fired check or assert
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}
