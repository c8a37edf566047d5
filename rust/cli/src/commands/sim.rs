//! Simulation command handler for batch game generation.
//!
//! Plays N computer-only games and optionally records each one as a
//! `GameRecord` JSON line. Game `i` uses seed `base_seed + i`, so any single
//! game can be regenerated from the file with `ludo replay`.
//!
//! # Environment Variables
//!
//! - `LUDO_SIM_BREAK_AFTER`: stop after N games and exit as interrupted (for testing)

use std::io::Write;
use std::path::PathBuf;

use ludo_engine::logger::{GameLogger, format_game_id};

use crate::config::{self, ConfigOverrides};
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::runner::play_ai_game;
use crate::ui;
use crate::validation::validate_games;

/// Handle the sim command.
///
/// # Arguments
///
/// * `games` - Number of games to simulate
/// * `output` - Path to write game records to (JSONL format)
/// * `overrides` - Command-line values for players, difficulty, seed and turn limit
/// * `out` - Output stream for progress messages
/// * `err` - Output stream for error messages
///
/// # Returns
///
/// `Ok(())` on success, `CliError::Interrupted` when `LUDO_SIM_BREAK_AFTER`
/// stopped the batch early, or another `CliError` on failure.
pub fn handle_sim_command(
    games: u32,
    output: Option<String>,
    overrides: ConfigOverrides,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(msg) = validate_games(games) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }

    let cfg = config::load_with_overrides(overrides)?.config;
    let specs = cfg.ai_players();
    let base_seed = cfg.seed.unwrap_or_else(rand::random);

    let mut logger = match output.map(PathBuf::from) {
        Some(path) => {
            if let Err(e) = ensure_parent_dir(&path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            match GameLogger::create(&path) {
                Ok(logger) => Some(logger),
                Err(e) => {
                    ui::write_error(err, &format!("Failed to open output file: {}", e))?;
                    return Err(CliError::Io(e));
                }
            }
        }
        None => None,
    };

    let break_after = std::env::var("LUDO_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u32>().ok());

    writeln!(
        out,
        "sim: games={} players={} difficulty={} seed={}",
        games, cfg.players, cfg.difficulty, base_seed
    )?;

    let mut completed = 0u32;
    let mut unfinished = 0u32;
    for i in 0..games {
        let game_id = match logger.as_mut() {
            Some(logger) => logger.next_id(),
            None => format_game_id("sim", i + 1),
        };
        let seed = base_seed.wrapping_add(u64::from(i));
        let record = play_ai_game(&game_id, &specs, seed, cfg.turn_limit)?;
        if record.winner.is_none() {
            unfinished += 1;
        }
        if let Some(logger) = logger.as_mut()
            && let Err(e) = logger.write(&record)
        {
            ui::write_error(err, &format!("Failed to write game {}: {}", game_id, e))?;
            return Err(CliError::Io(e));
        }

        completed += 1;
        if let Some(b) = break_after
            && completed == b
        {
            writeln!(out, "Interrupted: saved {}/{}", completed, games)?;
            return Err(CliError::Interrupted(format!(
                "saved {}/{}",
                completed, games
            )));
        }
    }

    if unfinished > 0 {
        ui::display_warning(
            err,
            &format!(
                "{} game(s) reached the turn limit of {} rolls",
                unfinished, cfg.turn_limit
            ),
        )?;
    }
    writeln!(out, "Simulated: {} games", completed)?;
    Ok(())
}
