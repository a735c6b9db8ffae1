//! Command-line interface definitions for snap-sim.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `snap-sim` binary.
#[derive(Parser, Debug)]
#[command(
    name = "snap-sim",
    about = "Replay window transitions against an in-memory desktop",
    version
)]
pub struct Cli {
    /// Logging controls shared across our binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Scenario file (JSON) describing screens, the window and transitions.
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Controller configuration (RON); defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print every frame applied to the window, not just the outcome.
    #[arg(long)]
    pub frames: bool,

    /// Run animations against the wall clock instead of virtual time.
    #[arg(long)]
    pub realtime: bool,
}
