//! Run orchestration: the test loop and the command-line front end.

/// Command-line argument parsing and process entry points.
pub mod cli;
/// Top-level test loop, verdicts, and exit codes.
pub mod runner;

pub use cli::{run_main, run_with_args, HarnessArgs};
pub use runner::{TestRunner, Verdict};
