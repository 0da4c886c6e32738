//! trace-demo - Walk through every trace-debug entry point
//!
//! Prints a trace to stderr, traces to stdout with 0 and 2 frames, a check,
//! an array slice and finally an assert. With `--trigger` the check and
//! assert conditions are true: the check prints a highlighted failure and
//! carries on, the assert prints one and exits with status 70.
//!
//! Usage:
//!     trace-demo
//!     trace-demo --trigger
//!     TRACE_DEBUG_FORMAT=json trace-demo --delay-ms 0

use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trace_debug::debug;

#[derive(Parser, Debug)]
#[command(name = "trace-demo")]
#[command(about = "Exercise the trace, check and assert calls")]
#[command(version)]
struct Args {
    /// Pause between calls, in milliseconds
    #[arg(long, default_value_t = 9)]
    delay_ms: u64,

    /// Make the check and assert conditions true
    #[arg(long)]
    trigger: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trace_debug=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let pause = || thread::sleep(Duration::from_millis(args.delay_ms));

    debug::trace("Trace to standard error");
    pause();
    debug::trace_stdout("Trace to standard out");
    pause();
    debug::trace_stdout_lines("0 lines of trace", 0);
    pause();
    debug::trace_stdout_lines("2 lines of trace", 2);
    pause();
    debug::check_stdout(args.trigger || 7 == 8, "assertion failures are bright red", 1);
    pause();

    let array = ["1", "2", "3"];
    debug::trace_array(&array, 0, 3, 1);

    debug::assert_stdout(args.trigger || 7 == 8, "assert is fatal, check is not", 1);
    println!("finished without a fatal assertion");
}
