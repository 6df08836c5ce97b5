//! Rampart - plays one game against the host over stdin/stdout.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use rampart::{Tuning, protocol};

/// Rampart - a tower-defense strategy bot
#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file overriding the default tuning knobs
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Log more (repeat for more detail); logs go to stderr
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

const fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `RUST_LOG`, when set, wins over `-v`.
fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::default().add_directive(log_level(verbose).into()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // stdout belongs to the host protocol.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            args.verbose,
            std::env::var("RUST_LOG").ok().as_deref(),
        ))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let tuning = match args.tuning.as_deref().map(Tuning::load).transpose() {
        Ok(tuning) => tuning.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match protocol::run(&tuning, stdin.lock(), stdout.lock()) {
        Ok(summary) => {
            info!(
                turns = summary.turns_played,
                frames = summary.action_frames,
                breaches = summary.breaches_suffered,
                "session finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
