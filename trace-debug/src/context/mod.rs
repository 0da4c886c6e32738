//! # Context Capture
//!
//! Collects the call frames around a trace/check/assert call site.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  capture(source, origin, depth)                     │
//! │  • depth == 0 returns immediately, no stack walk                    │
//! │  • truncates whatever the source returns to `depth`                 │
//! └────────────────────────────────┬────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       FrameSource (trait)                           │
//! ├──────────────────────┬──────────────────────┬───────────────────────┤
//! │ BacktraceFrameSource │ CallerFrameSource    │ FixedFrameSource      │
//! │ (real stack walk)    │ (call site only)     │ (testing)             │
//! └──────────────────────┴──────────────────────┴───────────────────────┘
//! ```
//!
//! `origin` is the caller location obtained through `#[track_caller]`. It
//! anchors the walk so the facility's own frames are never reported.

pub mod backends;

use std::panic::Location;

use crate::record::Frame;

pub use backends::{BacktraceFrameSource, CallerFrameSource, FixedFrameSource};

/// Source of call-frame descriptors
///
/// Implement this to plug in a different stack walker, or a fake with
/// canned frames for tests.
pub trait FrameSource: Send + Sync {
    /// Return up to `depth` frames, nearest caller first, starting at the
    /// frame that contains `origin`.
    fn capture(&self, origin: &'static Location<'static>, depth: usize) -> Vec<Frame>;

    /// Source name (for logging)
    fn name(&self) -> &'static str;
}

/// Capture up to `depth` frames from `source`.
///
/// Returns an empty sequence without calling the source when `depth` is 0.
pub fn capture(
    source: &dyn FrameSource,
    origin: &'static Location<'static>,
    depth: usize,
) -> Vec<Frame> {
    if depth == 0 {
        return Vec::new();
    }

    let mut frames = source.capture(origin, depth);
    frames.truncate(depth);
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_depth_skips_source() {
        let source = FixedFrameSource::new(["a", "b"]);
        let frames = capture(&source, Location::caller(), 0);

        assert!(frames.is_empty());
        assert_eq!(source.capture_count(), 0);
    }

    #[test]
    fn test_depth_is_upper_bound() {
        let source = FixedFrameSource::new(["a", "b", "c"]);

        for depth in 0..6 {
            let frames = capture(&source, Location::caller(), depth);
            assert_eq!(frames.len(), depth.min(3));
        }
    }

    #[test]
    fn test_truncates_overlong_source() {
        struct Greedy;

        impl FrameSource for Greedy {
            fn capture(&self, _origin: &'static Location<'static>, _depth: usize) -> Vec<Frame> {
                (0..10).map(|i| Frame::labelled(format!("f{}", i))).collect()
            }

            fn name(&self) -> &'static str {
                "greedy"
            }
        }

        let frames = capture(&Greedy, Location::caller(), 4);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].label(), "f0");
        assert_eq!(frames[3].label(), "f3");
    }
}
