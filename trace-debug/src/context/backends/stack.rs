//! Stack-walking frame source
//!
//! Walks the live stack with `backtrace::trace`, resolving each frame's
//! symbols. Inlined functions resolve to several symbols for one physical
//! frame; each of them is reported as its own frame, innermost first.

use std::panic::Location;

use crate::context::FrameSource;
use crate::record::Frame;

/// Frame source backed by a real stack walk
///
/// Everything above the caller's own frame (this crate, the `backtrace`
/// machinery) is skipped by anchoring on `origin`. When no frame can be
/// anchored, typically because the binary has no debug info, the result is
/// the single `origin` frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceFrameSource;

impl BacktraceFrameSource {
    /// Create a new stack-walking source
    pub fn new() -> Self {
        Self
    }

    fn frame_from_symbol(symbol: &backtrace::Symbol) -> Frame {
        Frame {
            function: symbol.name().map(|name| format!("{:#}", name)),
            file: symbol.filename().map(|path| path.display().to_string()),
            line: symbol.lineno(),
            column: symbol.colno(),
        }
    }
}

impl FrameSource for BacktraceFrameSource {
    fn capture(&self, origin: &'static Location<'static>, depth: usize) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(depth);
        let mut anchored = false;

        backtrace::trace(|raw| {
            backtrace::resolve_frame(raw, |symbol| {
                if frames.len() >= depth {
                    return;
                }
                let frame = Self::frame_from_symbol(symbol);
                if !anchored {
                    anchored = frame.is_call_site(origin);
                }
                if anchored {
                    frames.push(frame);
                }
            });
            frames.len() < depth
        });

        if frames.is_empty() {
            tracing::debug!(
                file = origin.file(),
                line = origin.line(),
                "could not anchor stack walk, reporting call site only"
            );
            frames.push(Frame::from_location(origin));
        }

        frames
    }

    fn name(&self) -> &'static str {
        "backtrace"
    }
}
