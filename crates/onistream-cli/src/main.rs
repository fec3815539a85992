// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

mod call;
mod error;
mod grab;
mod info;
mod modes;
mod stats;
mod utils;

use clap::{Parser, Subcommand};
use error::result_to_exit_code;
use std::process::ExitCode;
use utils::Options;

/// OniStream CLI - OpenNI 2 sensor inspection and frame capture tool
#[derive(Parser)]
#[command(name = "onistream")]
#[command(version)]
#[command(about = "OniStream CLI - OpenNI 2 sensor inspection and frame capture tool")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=trace for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Wait at most this many milliseconds for each frame (0 waits forever)
    #[arg(long, global = true, value_name = "MS")]
    timeout: Option<u64>,

    /// Skip streams whose sensor the device does not report
    #[arg(long, global = true)]
    tolerate_missing_sensors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one integer-coded switchyard operation
    Call(call::Args),

    /// Display device, registration and stream settings
    Info(info::Args),

    /// List the supported video modes of a stream
    Modes(modes::Args),

    /// Capture frames from a stream and measure the delivery rate
    Grab(grab::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    // Global flags shared by every subcommand
    let options = Options {
        json: cli.json,
        timeout_ms: cli.timeout,
        tolerate_missing_sensors: cli.tolerate_missing_sensors,
    };

    // Execute the subcommand and convert result to exit code
    let result = match cli.command {
        Commands::Call(args) => call::execute(args, &options),
        Commands::Info(args) => info::execute(args, &options),
        Commands::Modes(args) => modes::execute(args, &options),
        Commands::Grab(args) => grab::execute(args, &options),
    };

    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    // Determine log level from flags or RUST_LOG environment variable
    let env = env_logger::Env::default();

    let env = if quiet {
        // Quiet mode: only show errors
        env.default_filter_or("error")
    } else if verbose {
        // Verbose mode: show SDK calls and session steps
        env.default_filter_or("debug")
    } else {
        // Default: show info and above
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None) // Disable timestamps for cleaner CLI output
        .format_target(false) // Disable target (module path) for cleaner output
        .init();

    log::debug!("Logging initialized");
}
