//! Process-wide trace facade
//!
//! Free functions over one lazily created `Facility`. Unsuffixed names write
//! to the primary channel (stderr); `_stdout` names write to the secondary
//! channel (stdout).
//!
//! ```rust,no_run
//! use trace_debug::debug;
//!
//! debug::trace("Trace to standard error");
//! debug::trace_stdout_lines("2 lines of trace", 2);
//! debug::check_stdout(7 == 7, "check is not fatal", 1);
//! debug::trace_array(&["1", "2", "3"], 0, 3, 1);
//! debug::assert_stdout(7 == 8, "assert is fatal, check is not", 1);
//! ```
//!
//! To redirect output or swap the frame source, `install` a facility before
//! the first call.

use std::fmt;
use std::sync::OnceLock;

use crate::config::Switch;
use crate::engine::Facility;
use crate::error::{Result, TraceError};
use crate::record::Destination;

/// Frames attached by `trace` and `trace_stdout`
pub const DEFAULT_DEPTH: usize = 1;

static FACILITY: OnceLock<Facility> = OnceLock::new();

/// Install the process-wide facility.
///
/// Fails with `AlreadyInstalled` once any trace call has run or a facility
/// was installed before.
pub fn install(facility: Facility) -> Result<()> {
    FACILITY
        .set(facility)
        .map_err(|_| TraceError::AlreadyInstalled)?;
    tracing::debug!("trace facility installed");
    Ok(())
}

/// The process-wide facility, created from the environment on first use
pub fn facility() -> &'static Facility {
    FACILITY.get_or_init(|| {
        let facility = Facility::from_env();
        tracing::debug!(config = ?facility.config(), "trace facility created");
        facility
    })
}

/// Turn an entry family on
pub fn enable(switch: Switch) {
    facility().set_switch(switch, true);
}

/// Turn an entry family off
pub fn disable(switch: Switch) {
    facility().set_switch(switch, false);
}

// ═══════════════════════════════════════════════════════════════════════════
// Trace family
// ═══════════════════════════════════════════════════════════════════════════

/// Trace to stderr with one frame of context
#[track_caller]
pub fn trace(message: impl AsRef<str>) {
    facility().trace(Destination::Primary, message, DEFAULT_DEPTH);
}

/// Trace to stderr with up to `depth` frames
#[track_caller]
pub fn trace_lines(message: impl AsRef<str>, depth: usize) {
    facility().trace(Destination::Primary, message, depth);
}

/// Trace to stdout with one frame of context
#[track_caller]
pub fn trace_stdout(message: impl AsRef<str>) {
    facility().trace(Destination::Secondary, message, DEFAULT_DEPTH);
}

/// Trace to stdout with up to `depth` frames
#[track_caller]
pub fn trace_stdout_lines(message: impl AsRef<str>, depth: usize) {
    facility().trace(Destination::Secondary, message, depth);
}

/// Dump `sequence[start..end]` to stdout
#[track_caller]
pub fn trace_array<T: fmt::Display>(sequence: &[T], start: usize, end: usize, depth: usize) {
    facility().trace_array(Destination::Secondary, sequence, start, end, depth);
}

/// Dump `sequence[start..end]` to stderr
#[track_caller]
pub fn trace_array_stderr<T: fmt::Display>(sequence: &[T], start: usize, end: usize, depth: usize) {
    facility().trace_array(Destination::Primary, sequence, start, end, depth);
}

// ═══════════════════════════════════════════════════════════════════════════
// Check family (non-fatal)
// ═══════════════════════════════════════════════════════════════════════════

/// Report to stderr when `condition` is true, then continue
#[track_caller]
pub fn check(condition: bool, message: impl AsRef<str>, depth: usize) {
    let _ = facility().check(Destination::Primary, condition, message, depth);
}

/// Report to stdout when `condition` is true, then continue
#[track_caller]
pub fn check_stdout(condition: bool, message: impl AsRef<str>, depth: usize) {
    let _ = facility().check(Destination::Secondary, condition, message, depth);
}

/// Report to stderr when `left != right`, then continue
#[track_caller]
pub fn check_equals<T: PartialEq + fmt::Debug + ?Sized>(
    left: &T,
    right: &T,
    message: impl AsRef<str>,
    depth: usize,
) {
    let _ = facility().check_equals(Destination::Primary, left, right, message, depth);
}

/// Report to stdout when `left != right`, then continue
#[track_caller]
pub fn check_equals_stdout<T: PartialEq + fmt::Debug + ?Sized>(
    left: &T,
    right: &T,
    message: impl AsRef<str>,
    depth: usize,
) {
    let _ = facility().check_equals(Destination::Secondary, left, right, message, depth);
}

// ═══════════════════════════════════════════════════════════════════════════
// Assert family (fatal)
// ═══════════════════════════════════════════════════════════════════════════

/// Report to stderr and exit with `ASSERTION_EXIT_CODE` when `condition` is true
#[track_caller]
pub fn assert(condition: bool, message: impl AsRef<str>, depth: usize) {
    facility()
        .assert(Destination::Primary, condition, message, depth)
        .enforce();
}

/// Report to stdout and exit with `ASSERTION_EXIT_CODE` when `condition` is true
#[track_caller]
pub fn assert_stdout(condition: bool, message: impl AsRef<str>, depth: usize) {
    facility()
        .assert(Destination::Secondary, condition, message, depth)
        .enforce();
}

/// Report to stderr and exit when `left != right`
#[track_caller]
pub fn assert_equals<T: PartialEq + fmt::Debug + ?Sized>(
    left: &T,
    right: &T,
    message: impl AsRef<str>,
    depth: usize,
) {
    facility()
        .assert_equals(Destination::Primary, left, right, message, depth)
        .enforce();
}

/// Report to stdout and exit when `left != right`
#[track_caller]
pub fn assert_equals_stdout<T: PartialEq + fmt::Debug + ?Sized>(
    left: &T,
    right: &T,
    message: impl AsRef<str>,
    depth: usize,
) {
    facility()
        .assert_equals(Destination::Secondary, left, right, message, depth)
        .enforce();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_after_first_use_fails() {
        let _ = facility();

        let err = install(Facility::from_env()).unwrap_err();
        assert!(matches!(err, TraceError::AlreadyInstalled));
    }

    #[test]
    fn test_held_conditions_are_silent_noops() {
        check(false, "never shown", 3);
        check_stdout(false, "never shown", 3);
        check_equals(&1, &1, "never shown", 0);
        assert(false, "never shown", 3);
        assert_stdout(false, "never shown", 3);
        assert_equals_stdout("x", "x", "never shown", 0);
    }
}
