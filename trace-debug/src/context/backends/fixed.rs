//! Canned frame source for testing
//!
//! Returns a fixed list of frames and counts captures, so formatter and
//! sink tests do not depend on real stack introspection.

use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::context::FrameSource;
use crate::record::Frame;

/// Frame source that returns the same frames on every capture
#[derive(Debug, Default)]
pub struct FixedFrameSource {
    /// Frames handed out, nearest first
    frames: Vec<Frame>,
    /// Number of capture calls seen
    captures: AtomicUsize,
}

impl FixedFrameSource {
    /// Create a source from frame labels
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_frames(labels.into_iter().map(Frame::labelled).collect())
    }

    /// Create a source from full frame descriptors
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            captures: AtomicUsize::new(0),
        }
    }

    /// How many times `capture` was called
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl FrameSource for FixedFrameSource {
    fn capture(&self, _origin: &'static Location<'static>, depth: usize) -> Vec<Frame> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.frames.iter().take(depth).cloned().collect()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
