//! # Ludo CLI Library
//!
//! This library provides the command-line interface for the Ludo rules engine.
//! It exposes subcommands for playing, simulating, evaluating, and checking games.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand. [`run_with_input`] does the same with an
//! injected input stream for the interactive `play` command.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["ludo", "play", "--players", "4", "--difficulty", "hard"];
//! let code = ludo_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play against AI opponents, or watch an all-AI game
//! - `sim`: Simulate computer-only games and write `GameRecord` JSONL
//! - `eval`: Play two AI tiers head-to-head
//! - `replay`: Re-simulate recorded games and check they match
//! - `stats`: Aggregate statistics from recorded games
//! - `cfg`: Display the resolved configuration
//! - `rng`: Inspect the seeded die

use clap::Parser;
use std::io::{BufRead, Write};

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod runner;
pub mod ui;
pub mod validation;

use cli::{Commands, LudoCli};
use commands::{
    handle_cfg_command, handle_eval_command, handle_play_command, handle_replay_command,
    handle_rng_command, handle_sim_command, handle_stats_command,
};

pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "sim", "eval", "replay", "stats", "cfg", "rng"];

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand
/// handler. `play` reads move choices from the process's stdin.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["ludo", "rng", "--seed", "42"];
/// let code = ludo_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, out, err, &mut stdin_lock)
}

/// [`run`] with an injected input stream.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = ludo_cli::run_with_input(
///     ["ludo", "play", "--seed", "3"],
///     &mut out,
///     &mut err,
///     &mut Cursor::new("q\n"),
/// );
/// assert_eq!(code, 0);
/// ```
pub fn run_with_input<I, S>(
    args: I,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match LudoCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(&e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play { game, watch } => {
            handle_play_command(game.into(), watch, out, err, stdin)
        }
        Commands::Sim {
            games,
            output,
            game,
        } => handle_sim_command(games, output, game.into(), out, err),
        Commands::Eval {
            ai_a,
            ai_b,
            games,
            seed,
        } => handle_eval_command(ai_a, ai_b, games, seed, out, err),
        Commands::Replay { input, show } => handle_replay_command(input, show, out, err),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Rng { seed, rolls } => handle_rng_command(seed, rolls, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    if writeln!(err, "{}", e).is_err()
        || writeln!(err).is_err()
        || writeln!(err, "Ludo CLI").is_err()
        || writeln!(err, "Usage: ludo <command> [options]\n").is_err()
        || writeln!(err, "Commands:").is_err()
    {
        return exit_code::ERROR;
    }
    for c in COMMANDS {
        if writeln!(err, "  {}", c).is_err() {
            return exit_code::ERROR;
        }
    }
    let _ = writeln!(err, "\nFor full help, run: ludo --help");
    exit_code::ERROR
}
