//! # trace-debug
//!
//! Trace, check and assert calls for programs under test or debugging.
//! Every message carries its call site and, on request, the enclosing call
//! frames, so a failure can be located without a logging framework.
//!
//! - **Trace**: print a message (and optional frames, or a slice of a
//!   sequence) to stderr or stdout
//! - **Check**: when a condition is true, print a highlighted failure and
//!   keep going
//! - **Assert**: when a condition is true, print a highlighted failure and
//!   stop the process with exit status [`ASSERTION_EXIT_CODE`]
//!
//! ## Example
//!
//! ```rust
//! use trace_debug::{Destination, Facility, FixedFrameSource, Sink, TraceConfig, Verdict};
//!
//! let (sink, _stderr, stdout) = Sink::in_memory();
//! let facility = Facility::with_parts(
//!     TraceConfig::default(),
//!     Box::new(FixedFrameSource::new(["app::run", "app::main"])),
//!     sink,
//! );
//!
//! facility.trace(Destination::Secondary, "2 lines of trace", 2);
//! let verdict = facility.check(Destination::Secondary, 7 == 7, "check is not fatal", 1);
//! assert_eq!(verdict, Verdict::Reported);
//!
//! facility.trace_array(Destination::Secondary, &["1", "2", "3"], 0, 3, 0);
//! assert!(stdout.contents().contains("3 elements: [1, 2, 3]"));
//! ```
//!
//! The free functions in [`debug`] (re-exported here) use one process-wide
//! facility writing to the real stderr/stdout.

pub mod config;
pub mod context;
pub mod debug;
pub mod engine;
pub mod error;
pub mod format;
pub mod record;
pub mod sink;

// Re-export main types
pub use config::{ColorChoice, FrameMode, OutputFormat, Switch, TraceConfig};
pub use context::{BacktraceFrameSource, CallerFrameSource, FixedFrameSource, FrameSource};
pub use engine::{terminate, Facility, Verdict, ASSERTION_EXIT_CODE};
pub use error::{Result, TraceError};
pub use format::Formatter;
pub use record::{Destination, Frame, Severity, SliceDump, TraceRecord};
pub use sink::{MemoryWriter, Sink};

pub use debug::{
    assert, assert_equals, assert_equals_stdout, assert_stdout, check, check_equals,
    check_equals_stdout, check_stdout, disable, enable, install, trace, trace_array,
    trace_array_stderr, trace_lines, trace_stdout, trace_stdout_lines, DEFAULT_DEPTH,
};
