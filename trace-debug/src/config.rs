//! Facility configuration
//!
//! There is no configuration file. Settings come from the builder or from
//! the environment:
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `TRACE_DEBUG_COLOR` | `always`, `never`, `auto` | `auto` |
//! | `NO_COLOR` | any value disables `auto` color | unset |
//! | `TRACE_DEBUG_FORMAT` | `text`, `json` | `text` |
//! | `TRACE_DEBUG_FRAMES` | `backtrace`, `caller` | `backtrace` |

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, TraceError};

pub const ENV_COLOR: &str = "TRACE_DEBUG_COLOR";
pub const ENV_NO_COLOR: &str = "NO_COLOR";
pub const ENV_FORMAT: &str = "TRACE_DEBUG_FORMAT";
pub const ENV_FRAMES: &str = "TRACE_DEBUG_FRAMES";

/// When failure records get ANSI emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    Always,
    Never,
    /// Color unless `NO_COLOR` is set
    #[default]
    Auto,
}

impl FromStr for ColorChoice {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            "auto" => Ok(ColorChoice::Auto),
            _ => Err(TraceError::InvalidSetting {
                key: ENV_COLOR,
                value: s.to_string(),
                expected: "always, never, auto",
            }),
        }
    }
}

/// Rendering used by the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable block, one line per frame
    #[default]
    Text,
    /// One JSON object per record
    Json,
}

impl FromStr for OutputFormat {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(TraceError::InvalidSetting {
                key: ENV_FORMAT,
                value: s.to_string(),
                expected: "text, json",
            }),
        }
    }
}

/// Which frame source the default facility uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    /// Real stack walk
    #[default]
    Backtrace,
    /// Call site only
    Caller,
}

impl FromStr for FrameMode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backtrace" => Ok(FrameMode::Backtrace),
            "caller" => Ok(FrameMode::Caller),
            _ => Err(TraceError::InvalidSetting {
                key: ENV_FRAMES,
                value: s.to_string(),
                expected: "backtrace, caller",
            }),
        }
    }
}

/// Facility configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceConfig {
    /// Failure emphasis
    pub color: ColorChoice,
    /// Output rendering
    pub format: OutputFormat,
    /// Frame source selection
    pub frames: FrameMode,
}

impl TraceConfig {
    /// Create a new configuration builder
    pub fn builder() -> TraceConfigBuilder {
        TraceConfigBuilder::default()
    }

    /// Load from the process environment.
    ///
    /// Unknown values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from the process environment, failing on the first bad value
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    /// Lenient load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let color = parse_or_default(&lookup, ENV_COLOR);
        let format = parse_or_default(&lookup, ENV_FORMAT);
        let frames = parse_or_default(&lookup, ENV_FRAMES);

        Self::assemble(color, format, frames, lookup(ENV_NO_COLOR).is_some())
    }

    /// Strict load from an arbitrary key lookup
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let color: Option<ColorChoice> = lookup(ENV_COLOR).map(|v| v.parse()).transpose()?;
        let format: Option<OutputFormat> = lookup(ENV_FORMAT).map(|v| v.parse()).transpose()?;
        let frames: Option<FrameMode> = lookup(ENV_FRAMES).map(|v| v.parse()).transpose()?;

        Ok(Self::assemble(
            color.unwrap_or_default(),
            format.unwrap_or_default(),
            frames.unwrap_or_default(),
            lookup(ENV_NO_COLOR).is_some(),
        ))
    }

    fn assemble(color: ColorChoice, format: OutputFormat, frames: FrameMode, no_color: bool) -> Self {
        let color = match color {
            ColorChoice::Auto if no_color => ColorChoice::Never,
            other => other,
        };
        Self { color, format, frames }
    }

    /// True if failure records should carry ANSI color
    pub fn color_enabled(&self) -> bool {
        !matches!(self.color, ColorChoice::Never)
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &'static str) -> T
where
    T: FromStr<Err = TraceError> + Default,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "ignoring invalid trace-debug setting");
            T::default()
        }
        None => T::default(),
    }
}

/// Builder for TraceConfig
#[derive(Debug, Default)]
pub struct TraceConfigBuilder {
    color: Option<ColorChoice>,
    format: Option<OutputFormat>,
    frames: Option<FrameMode>,
}

impl TraceConfigBuilder {
    /// Set the color choice
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the frame source
    pub fn frames(mut self, frames: FrameMode) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Build the configuration
    pub fn build(self) -> TraceConfig {
        TraceConfig {
            color: self.color.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            frames: self.frames.unwrap_or_default(),
        }
    }
}

/// Runtime on/off toggles for each entry family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Trace family output to the primary (stderr) channel
    TraceErr,
    /// Trace family output to the secondary (stdout) channel
    TraceOut,
    /// Assert family
    FatalAssert,
    /// Check family
    NonFatalAssert,
}

/// Current state of every `Switch`; all on by default
#[derive(Debug)]
pub struct Switches {
    trace_err: AtomicBool,
    trace_out: AtomicBool,
    fatal_assert: AtomicBool,
    non_fatal_assert: AtomicBool,
}

impl Switches {
    /// All switches on
    pub fn new() -> Self {
        Self {
            trace_err: AtomicBool::new(true),
            trace_out: AtomicBool::new(true),
            fatal_assert: AtomicBool::new(true),
            non_fatal_assert: AtomicBool::new(true),
        }
    }

    fn flag(&self, switch: Switch) -> &AtomicBool {
        match switch {
            Switch::TraceErr => &self.trace_err,
            Switch::TraceOut => &self.trace_out,
            Switch::FatalAssert => &self.fatal_assert,
            Switch::NonFatalAssert => &self.non_fatal_assert,
        }
    }

    /// Turn a switch on or off
    pub fn set(&self, switch: Switch, on: bool) {
        self.flag(switch).store(on, Ordering::Relaxed);
    }

    /// Read a switch
    pub fn is_on(&self, switch: Switch) -> bool {
        self.flag(switch).load(Ordering::Relaxed)
    }
}

impl Default for Switches {
    fn default() -> Self {
        Self::new()
    }
}
