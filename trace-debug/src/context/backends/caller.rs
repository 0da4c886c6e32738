//! Call-site-only frame source

use std::panic::Location;

use crate::context::FrameSource;
use crate::record::Frame;

/// Reports the `#[track_caller]` location and nothing else
///
/// Output is deterministic for a given call site and does not depend on
/// debug info, at the cost of never showing enclosing frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallerFrameSource;

impl CallerFrameSource {
    /// Create a new call-site source
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for CallerFrameSource {
    fn capture(&self, origin: &'static Location<'static>, depth: usize) -> Vec<Frame> {
        if depth == 0 {
            return Vec::new();
        }
        vec![Frame::from_location(origin)]
    }

    fn name(&self) -> &'static str {
        "caller"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_frame() {
        let origin = Location::caller();
        let frames = CallerFrameSource::new().capture(origin, 5);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].line, Some(origin.line()));
        assert_eq!(frames[0].file.as_deref(), Some(origin.file()));
    }

    #[test]
    fn test_caller_frame_zero_depth() {
        assert!(CallerFrameSource::new().capture(Location::caller(), 0).is_empty());
    }
}
