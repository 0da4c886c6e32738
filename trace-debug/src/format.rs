//! Record formatting
//!
//! Turns a `TraceRecord` into the text block the sink writes. Formatting is
//! pure: no I/O, no clocks, no thread lookups. Everything comes from the
//! record.
//!
//! Text layout:
//!
//! ```text
//! "message" in thread main:
//! 	at frame 1
//! 	at frame 2
//! 	3 elements: [1, 2, 3]
//! ```
//!
//! The message is rendered escaped (`{:?}`), so a message holding a newline
//! stays on the headline and cannot pose as a frame line.
//!
//! JSON output is one object per line. Failures carry `"failed": true` in
//! place of the color or marker emphasis.

use std::fmt::Write as _;

use crate::config::{OutputFormat, TraceConfig};
use serde::Serialize;

use crate::error::{Result, TraceError};
use crate::record::{SliceDump, TraceRecord};

/// ANSI emphasis for failures
const RESET: &str = "\x1b[0m";
const BOLD_RED: &str = "\x1b[1;31m";

/// Prefix for failures when color is off
pub const FAILURE_MARKER: &str = "[FAILED] ";

/// Renders records for the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    format: OutputFormat,
    color: bool,
}

impl Formatter {
    /// Create a formatter
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    /// Create a formatter matching a configuration
    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(config.format, config.color_enabled())
    }

    /// Render a record, falling back to text if JSON rendering fails
    pub fn format(&self, record: &TraceRecord) -> String {
        match self.try_format(record) {
            Ok(text) => text,
            Err(e) => self.fallback(record, &e),
        }
    }

    fn fallback(&self, record: &TraceRecord, error: &TraceError) -> String {
        tracing::warn!(
            error = %error,
            code = error.error_code(),
            "falling back to text format"
        );
        self.format_text(record)
    }

    /// Render a record in the configured format
    pub fn try_format(&self, record: &TraceRecord) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.format_text(record)),
            OutputFormat::Json => Ok(serde_json::to_string(&JsonRecord::from(record))?),
        }
    }

    fn format_text(&self, record: &TraceRecord) -> String {
        let mut out = String::new();

        let headline = format!("{:?} in thread {}:", record.message, record.thread);
        match (record.is_failure(), self.color) {
            (true, true) => {
                let _ = write!(out, "{}{}{}", BOLD_RED, headline, RESET);
            }
            (true, false) => {
                out.push_str(FAILURE_MARKER);
                out.push_str(&headline);
            }
            (false, _) => out.push_str(&headline),
        }

        for frame in &record.context_frames {
            let _ = write!(out, "\n\tat {}", frame);
        }

        if let Some(dump) = &record.slice_dump {
            out.push_str("\n\t");
            out.push_str(&render_slice(dump));
        }

        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::from_config(&TraceConfig::default())
    }
}

/// JSON shape of a record: the record's fields plus a failure flag
#[derive(Serialize)]
struct JsonRecord<'a> {
    failed: bool,
    #[serde(flatten)]
    record: &'a TraceRecord,
}

impl<'a> From<&'a TraceRecord> for JsonRecord<'a> {
    fn from(record: &'a TraceRecord) -> Self {
        Self {
            failed: record.is_failure(),
            record,
        }
    }
}

/// `"<count> elements: [a, b, c]"`
fn render_slice(dump: &SliceDump) -> String {
    format!("{} elements: [{}]", dump.count, dump.elements.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Destination, Frame, Severity};

    fn info(message: &str) -> TraceRecord {
        TraceRecord::new(Destination::Secondary, Severity::Info, message).with_thread("main")
    }

    fn failure(message: &str) -> TraceRecord {
        TraceRecord::new(Destination::Secondary, Severity::Failure, message).with_thread("main")
    }

    #[test]
    fn test_info_without_frames() {
        let text = Formatter::new(OutputFormat::Text, true).format(&info("hello"));
        assert_eq!(text, "\"hello\" in thread main:");
    }

    #[test]
    fn test_frames_are_indented_lines() {
        let record = info("two lines").with_frames(
            2,
            vec![Frame::labelled("app::inner"), Frame::labelled("app::main")],
        );
        let text = Formatter::new(OutputFormat::Text, true).format(&record);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\"two lines\" in thread main:");
        assert_eq!(lines[1], "\tat app::inner");
        assert_eq!(lines[2], "\tat app::main");
    }

    #[test]
    fn test_failure_is_colored() {
        let text = Formatter::new(OutputFormat::Text, true).format(&failure("boom"));
        assert!(text.starts_with(BOLD_RED));
        assert!(text.contains("\"boom\""));
        assert!(text.ends_with(RESET));
    }

    #[test]
    fn test_failure_marker_without_color() {
        let text = Formatter::new(OutputFormat::Text, false).format(&failure("boom"));
        assert!(text.starts_with(FAILURE_MARKER));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_info_is_never_emphasized() {
        let text = Formatter::new(OutputFormat::Text, true).format(&info("calm"));
        assert!(!text.contains('\x1b'));
        assert!(!text.contains(FAILURE_MARKER));
    }

    #[test]
    fn test_slice_dump_follows_frames() {
        let record = info("array")
            .with_frames(1, vec![Frame::labelled("app::main")])
            .with_slice(SliceDump::new(&["1", "2", "3"], 0, 3));
        let text = Formatter::new(OutputFormat::Text, false).format(&record);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "\tat app::main");
        assert_eq!(lines[2], "\t3 elements: [1, 2, 3]");
    }

    #[test]
    fn test_clamped_slice_reports_requested_count() {
        let record = info("array").with_slice(SliceDump::new(&["a", "b"], 0, 5));
        let text = Formatter::new(OutputFormat::Text, false).format(&record);
        assert!(text.ends_with("5 elements: [a, b]"));
    }

    #[test]
    fn test_json_is_single_line() {
        let record = failure("json me")
            .with_frames(1, vec![Frame::labelled("app::main")])
            .with_slice(SliceDump::new(&[1, 2], 0, 2));
        let text = Formatter::new(OutputFormat::Json, true).format(&record);

        assert!(!text.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["message"], "json me");
        assert_eq!(value["severity"], "failure");
        assert_eq!(value["destination"], "secondary");
        assert_eq!(value["slice_dump"]["count"], 2);
        assert_eq!(value["context_frames"][0]["function"], "app::main");
    }

    #[test]
    fn test_json_flags_failures() {
        let formatter = Formatter::new(OutputFormat::Json, false);

        let fired: serde_json::Value =
            serde_json::from_str(&formatter.format(&failure("fired"))).unwrap();
        let quiet: serde_json::Value =
            serde_json::from_str(&formatter.format(&info("quiet"))).unwrap();

        assert_eq!(fired["failed"], true);
        assert_eq!(quiet["failed"], false);
        assert_eq!(quiet["message"], "quiet");
    }

    #[test]
    fn test_message_newlines_cannot_forge_frames() {
        let record = info("evil\n\tat app::forged")
            .with_frames(1, vec![Frame::labelled("app::main")]);
        let text = Formatter::new(OutputFormat::Text, false).format(&record);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "\"evil\\n\\tat app::forged\" in thread main:");
        assert_eq!(lines[1], "\tat app::main");
    }

    #[test]
    fn test_quotes_in_message_are_escaped() {
        let text = Formatter::new(OutputFormat::Text, false).format(&info("say \"hi\""));
        assert_eq!(text, r#""say \"hi\"" in thread main:"#);
    }

    #[test]
    fn test_fallback_renders_text() {
        let error = TraceError::from(serde_json::from_str::<u8>("not json").unwrap_err());
        let formatter = Formatter::new(OutputFormat::Json, false);

        let text = formatter.fallback(&info("rescued"), &error);
        assert_eq!(text, "\"rescued\" in thread main:");
    }
}
