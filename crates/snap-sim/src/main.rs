#![warn(missing_docs)]

//! Entry point for the `snap-sim` binary.

mod cli;
mod error;
mod run;
mod scenario;

use std::{io, process};

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{cli::Cli, error::Result};

fn main() {
    if let Err(err) = try_main() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and replay the scenario.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let env_filter = logging::env_filter_from_spec(&cli.log.spec());
    registry()
        .with(env_filter)
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();
    run::run(&cli)
}
