//! Frame source implementations
//!
//! - `BacktraceFrameSource`: walks the real stack with the `backtrace` crate
//! - `CallerFrameSource`: reports only the `#[track_caller]` location
//! - `FixedFrameSource`: for testing, returns canned frames
//!
//! ## Choosing a Source
//!
//! - **Default**: `BacktraceFrameSource`
//! - **Stripped binaries / stable output**: `CallerFrameSource`
//! - **Tests**: `FixedFrameSource`

mod caller;
mod fixed;
mod stack;

pub use caller::CallerFrameSource;
pub use fixed::FixedFrameSource;
pub use stack::BacktraceFrameSource;
