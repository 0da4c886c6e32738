//! Trace, check and assert engine
//!
//! `Facility` ties the pieces together:
//!
//! ```text
//! call site ──► capture frames ──► TraceRecord ──► Formatter ──► Sink
//!   (#[track_caller])                                             │
//!                                                                 ▼
//!                                              Verdict::Fatal ──► terminate()
//! ```
//!
//! Entry families:
//!
//! - **trace**: always emits an Info record, never evaluates a condition.
//! - **check**: emits a Failure record when the condition is true, returns.
//! - **assert**: like check, but a fired assert yields `Verdict::Fatal`.
//!
//! The engine itself never exits the process. `Verdict::enforce` is the one
//! place that turns a fatal verdict into `terminate()`, which keeps the
//! reporting path testable on its own.

use std::fmt;
use std::panic::Location;

use crate::config::{FrameMode, Switch, Switches, TraceConfig};
use crate::context::{self, BacktraceFrameSource, CallerFrameSource, FrameSource};
use crate::format::Formatter;
use crate::record::{Destination, Severity, SliceDump, TraceRecord};
use crate::sink::Sink;

/// Exit status of a process stopped by a fired assertion (sysexits `EX_SOFTWARE`)
pub const ASSERTION_EXIT_CODE: i32 = 70;

/// Outcome of a check or assert call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Verdict {
    /// Condition was false, or the family is switched off; nothing written
    Held,
    /// Check fired; failure written, execution continues
    Reported,
    /// Assert fired; failure written, the process must stop
    Fatal,
}

impl Verdict {
    /// True unless the call reported something
    pub fn held(self) -> bool {
        self == Verdict::Held
    }

    /// Terminate the process on `Fatal`, otherwise return
    pub fn enforce(self) {
        if self == Verdict::Fatal {
            terminate();
        }
    }
}

/// Stop the process after a fired assertion.
///
/// Both standard streams are flushed by the sink before this is reached.
pub fn terminate() -> ! {
    tracing::debug!(code = ASSERTION_EXIT_CODE, "assertion fired, terminating");
    std::process::exit(ASSERTION_EXIT_CODE)
}

/// A trace facility instance
///
/// Owns its output channels and frame source. The process-wide instance used
/// by the free functions lives in `crate::debug`.
pub struct Facility {
    config: TraceConfig,
    switches: Switches,
    formatter: Formatter,
    frames: Box<dyn FrameSource>,
    sink: Sink,
}

impl fmt::Debug for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facility")
            .field("config", &self.config)
            .field("switches", &self.switches)
            .field("frames", &self.frames.name())
            .field("sink", &self.sink)
            .finish()
    }
}

impl Facility {
    /// Stdio facility using the frame source the configuration selects
    pub fn new(config: TraceConfig) -> Self {
        let frames: Box<dyn FrameSource> = match config.frames {
            FrameMode::Backtrace => Box::new(BacktraceFrameSource::new()),
            FrameMode::Caller => Box::new(CallerFrameSource::new()),
        };
        Self::with_parts(config, frames, Sink::stdio())
    }

    /// Stdio facility configured from the environment
    pub fn from_env() -> Self {
        Self::new(TraceConfig::from_env())
    }

    /// Facility over explicit parts
    pub fn with_parts(config: TraceConfig, frames: Box<dyn FrameSource>, sink: Sink) -> Self {
        Self {
            formatter: Formatter::from_config(&config),
            config,
            switches: Switches::new(),
            frames,
            sink,
        }
    }

    /// Replace the frame source
    pub fn with_frame_source<F: FrameSource + 'static>(mut self, frames: F) -> Self {
        self.frames = Box::new(frames);
        self
    }

    /// Replace the sink
    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Turn an entry family on or off
    pub fn set_switch(&self, switch: Switch, on: bool) {
        self.switches.set(switch, on);
    }

    /// Read an entry family switch
    pub fn switch(&self, switch: Switch) -> bool {
        self.switches.is_on(switch)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Trace family
    // ═══════════════════════════════════════════════════════════════════════

    /// Emit an Info record with up to `depth` caller frames
    #[track_caller]
    pub fn trace(&self, destination: Destination, message: impl AsRef<str>, depth: usize) {
        if !self.trace_enabled(destination) {
            return;
        }
        let record = self.record(destination, Severity::Info, message.as_ref(), depth);
        self.emit(record);
    }

    /// Emit an Info record dumping `sequence[start..end]`.
    ///
    /// Out-of-range bounds are clamped and inverted ranges dump nothing; the
    /// reported element count is always the requested `end - start`.
    #[track_caller]
    pub fn trace_array<T: fmt::Display>(
        &self,
        destination: Destination,
        sequence: &[T],
        start: usize,
        end: usize,
        depth: usize,
    ) {
        if !self.trace_enabled(destination) {
            return;
        }
        let dump = SliceDump::new(sequence, start, end);
        if dump.was_clamped() {
            tracing::debug!(
                start,
                end,
                len = sequence.len(),
                "array trace range clamped to sequence bounds"
            );
        }

        let message = format!("Array slice [{}, {}) of {}", start, end, sequence.len());
        let record = self
            .record(destination, Severity::Info, &message, depth)
            .with_slice(dump);
        self.emit(record);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Check / assert families
    // ═══════════════════════════════════════════════════════════════════════

    /// Report a failure when `condition` is true; never stops the process
    #[track_caller]
    pub fn check(
        &self,
        destination: Destination,
        condition: bool,
        message: impl AsRef<str>,
        depth: usize,
    ) -> Verdict {
        if !condition || !self.switch(Switch::NonFatalAssert) {
            return Verdict::Held;
        }
        self.report(destination, message.as_ref(), depth);
        Verdict::Reported
    }

    /// Report a failure when `condition` is true and return `Verdict::Fatal`.
    ///
    /// The caller decides when to stop; see `Verdict::enforce`.
    #[track_caller]
    pub fn assert(
        &self,
        destination: Destination,
        condition: bool,
        message: impl AsRef<str>,
        depth: usize,
    ) -> Verdict {
        if !condition || !self.switch(Switch::FatalAssert) {
            return Verdict::Held;
        }
        self.report(destination, message.as_ref(), depth);
        Verdict::Fatal
    }

    /// `check` that fires when `left != right`
    #[track_caller]
    pub fn check_equals<T: PartialEq + fmt::Debug + ?Sized>(
        &self,
        destination: Destination,
        left: &T,
        right: &T,
        message: impl AsRef<str>,
        depth: usize,
    ) -> Verdict {
        if left == right {
            return Verdict::Held;
        }
        let message = mismatch_message(left, right, message.as_ref());
        self.check(destination, true, message, depth)
    }

    /// `assert` that fires when `left != right`
    #[track_caller]
    pub fn assert_equals<T: PartialEq + fmt::Debug + ?Sized>(
        &self,
        destination: Destination,
        left: &T,
        right: &T,
        message: impl AsRef<str>,
        depth: usize,
    ) -> Verdict {
        if left == right {
            return Verdict::Held;
        }
        let message = mismatch_message(left, right, message.as_ref());
        self.assert(destination, true, message, depth)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════

    fn trace_enabled(&self, destination: Destination) -> bool {
        match destination {
            Destination::Primary => self.switch(Switch::TraceErr),
            Destination::Secondary => self.switch(Switch::TraceOut),
        }
    }

    #[track_caller]
    fn report(&self, destination: Destination, message: &str, depth: usize) {
        let record = self.record(destination, Severity::Failure, message, depth);
        self.emit(record);
    }

    #[track_caller]
    fn record(
        &self,
        destination: Destination,
        severity: Severity,
        message: &str,
        depth: usize,
    ) -> TraceRecord {
        let origin: &'static Location<'static> = Location::caller();
        let frames = context::capture(self.frames.as_ref(), origin, depth);
        TraceRecord::new(destination, severity, message).with_frames(depth, frames)
    }

    fn emit(&self, record: TraceRecord) {
        let text = self.formatter.format(&record);
        if let Err(e) = self.sink.write(record.destination, &text) {
            tracing::warn!(error = %e, code = e.error_code(), "dropped trace record");
        }
    }
}

fn mismatch_message<T: fmt::Debug + ?Sized>(left: &T, right: &T, message: &str) -> String {
    format!("{} (left: {:?}, right: {:?})", message, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;
    use crate::context::FixedFrameSource;
    use crate::sink::MemoryWriter;

    fn facility() -> (Facility, MemoryWriter, MemoryWriter) {
        let (sink, primary, secondary) = Sink::in_memory();
        let config = TraceConfig::builder().color(ColorChoice::Never).build();
        let facility = Facility::with_parts(
            config,
            Box::new(FixedFrameSource::new(["app::inner", "app::outer", "app::main"])),
            sink,
        );
        (facility, primary, secondary)
    }

    #[test]
    fn test_trace_routes_by_destination() {
        let (facility, primary, secondary) = facility();

        facility.trace(Destination::Primary, "to stderr", 0);
        facility.trace(Destination::Secondary, "to stdout", 0);

        assert!(primary.contents().contains("\"to stderr\""));
        assert!(!primary.contents().contains("to stdout"));
        assert!(secondary.contents().contains("\"to stdout\""));
    }

    #[test]
    fn test_trace_depth_zero_has_no_frames() {
        let (facility, _, secondary) = facility();

        facility.trace(Destination::Secondary, "0 lines of trace", 0);

        let contents = secondary.contents();
        assert_eq!(contents.lines().count(), 1);
        assert!(!contents.contains("\tat "));
    }

    #[test]
    fn test_trace_depth_two_has_two_frames() {
        let (facility, _, secondary) = facility();

        facility.trace(Destination::Secondary, "2 lines of trace", 2);

        let contents = secondary.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2 lines of trace"));
        assert_eq!(lines[1], "\tat app::inner");
        assert_eq!(lines[2], "\tat app::outer");
    }

    #[test]
    fn test_check_false_writes_nothing() {
        let (facility, primary, secondary) = facility();

        for depth in 0..4 {
            let verdict = facility.check(Destination::Secondary, false, "quiet", depth);
            assert_eq!(verdict, Verdict::Held);
            assert!(verdict.held());
        }

        assert!(primary.is_empty());
        assert!(secondary.is_empty());
    }

    #[test]
    fn test_check_true_reports_and_continues() {
        let (facility, _, secondary) = facility();

        let verdict = facility.check(Destination::Secondary, true, "check is not fatal", 1);
        let reached = true;

        assert_eq!(verdict, Verdict::Reported);
        assert!(reached);
        let contents = secondary.contents();
        assert!(contents.starts_with(crate::format::FAILURE_MARKER));
        assert!(contents.contains("check is not fatal"));
        assert!(contents.contains("\tat app::inner"));
    }

    #[test]
    fn test_assert_true_is_fatal_but_does_not_exit() {
        let (facility, primary, _) = facility();

        let verdict = facility.assert(Destination::Primary, true, "assert is fatal", 1);

        assert_eq!(verdict, Verdict::Fatal);
        assert!(primary.contents().contains("assert is fatal"));
    }

    #[test]
    fn test_assert_false_is_noop() {
        let (facility, primary, secondary) = facility();

        let verdict = facility.assert(Destination::Secondary, false, "fine", 3);
        verdict.enforce();

        assert_eq!(verdict, Verdict::Held);
        assert!(primary.is_empty());
        assert!(secondary.is_empty());
    }

    #[test]
    fn test_equality_family() {
        let (facility, _, secondary) = facility();

        assert!(facility
            .check_equals(Destination::Secondary, &3, &3, "same", 0)
            .held());
        assert!(secondary.is_empty());

        let verdict = facility.check_equals(Destination::Secondary, "a", "b", "differ", 0);
        assert_eq!(verdict, Verdict::Reported);
        assert!(secondary
            .contents()
            .contains(r#"differ (left: \"a\", right: \"b\")"#));

        let verdict = facility.assert_equals(Destination::Secondary, &[1, 2][..], &[1][..], "len", 0);
        assert_eq!(verdict, Verdict::Fatal);
    }

    #[test]
    fn test_trace_array_dump() {
        let (facility, _, secondary) = facility();

        facility.trace_array(Destination::Secondary, &["1", "2", "3"], 0, 3, 1);

        let contents = secondary.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\tat app::inner");
        assert_eq!(lines[2], "\t3 elements: [1, 2, 3]");
    }

    #[test]
    fn test_trace_array_clamps() {
        let (facility, _, secondary) = facility();

        facility.trace_array(Destination::Secondary, &[7, 8, 9], 1, 10, 0);

        assert!(secondary.contents().contains("\t9 elements: [8, 9]"));
    }

    #[test]
    fn test_switches_silence_families() {
        let (facility, primary, secondary) = facility();

        facility.set_switch(Switch::TraceErr, false);
        facility.set_switch(Switch::NonFatalAssert, false);
        facility.set_switch(Switch::FatalAssert, false);

        facility.trace(Destination::Primary, "muted", 0);
        facility.trace(Destination::Secondary, "still on", 0);
        assert_eq!(facility.check(Destination::Secondary, true, "muted", 0), Verdict::Held);
        assert_eq!(facility.assert(Destination::Secondary, true, "muted", 0), Verdict::Held);

        assert!(primary.is_empty());
        assert!(!secondary.contents().contains("muted"));
        assert!(secondary.contents().contains("still on"));
    }

    #[test]
    fn test_caller_source_reports_call_site() {
        let (sink, _, secondary) = Sink::in_memory();
        let facility = Facility::with_parts(TraceConfig::default(), Box::new(CallerFrameSource::new()), sink);

        let line = line!() + 1;
        facility.trace(Destination::Secondary, "where", 5);

        let contents = secondary.contents();
        assert!(contents.contains(&format!("engine.rs:{}:", line)));
        assert_eq!(contents.lines().count(), 2);
    }
}
