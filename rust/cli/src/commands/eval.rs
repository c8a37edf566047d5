//! AI tier evaluation command.
//!
//! Plays two tiers against each other in two-player games. Seats alternate
//! every game so neither tier keeps the first roll, and game `i` uses seed
//! `base_seed + i` so a run is reproducible.

use std::io::Write;

use ludo_engine::logger::format_game_id;
use ludo_engine::player::{Difficulty, PlayerSpec};

use crate::config::{self, ConfigOverrides};
use crate::error::CliError;
use crate::runner::play_ai_game;
use crate::ui;
use crate::validation::validate_games;

#[derive(Debug, Clone, Default)]
struct EvalStats {
    wins: u32,
    moves: u64,
    captures: u64,
}

impl EvalStats {
    fn win_rate(&self, games: u32) -> f64 {
        if games == 0 {
            0.0
        } else {
            (self.wins as f64 / games as f64) * 100.0
        }
    }

    fn avg_moves(&self, games: u32) -> f64 {
        if games == 0 {
            0.0
        } else {
            self.moves as f64 / games as f64
        }
    }
}

/// Evaluates two AI tiers head-to-head.
///
/// # Arguments
///
/// * `ai_a` - First tier
/// * `ai_b` - Second tier
/// * `games` - Number of games to play
/// * `seed` - Optional base seed for reproducibility
/// * `out` - Output stream for evaluation results
/// * `err` - Output stream for error messages
pub fn handle_eval_command(
    ai_a: Difficulty,
    ai_b: Difficulty,
    games: u32,
    seed: Option<u64>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(msg) = validate_games(games) {
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    }
    let cfg = config::load_with_overrides(ConfigOverrides {
        seed,
        ..ConfigOverrides::default()
    })?
    .config;
    let base_seed = cfg.seed.unwrap_or_else(rand::random);

    let mut stats_a = EvalStats::default();
    let mut stats_b = EvalStats::default();
    let mut unfinished = 0u32;

    for i in 0..games {
        let a_first = i % 2 == 0;
        let specs = if a_first {
            [PlayerSpec::ai(ai_a), PlayerSpec::ai(ai_b)]
        } else {
            [PlayerSpec::ai(ai_b), PlayerSpec::ai(ai_a)]
        };
        let (seat_a, seat_b) = if a_first { (0, 1) } else { (1, 0) };
        let game_id = format_game_id("eval", i + 1);
        let record = play_ai_game(
            &game_id,
            &specs,
            base_seed.wrapping_add(u64::from(i)),
            cfg.turn_limit,
        )?;

        for (stats, seat) in [(&mut stats_a, seat_a), (&mut stats_b, seat_b)] {
            stats.moves += record.moves.iter().filter(|m| m.player == seat).count() as u64;
            stats.captures += record
                .moves
                .iter()
                .filter(|m| m.player == seat && m.captured.is_some())
                .count() as u64;
        }
        match record.winner {
            Some(w) if w == seat_a => stats_a.wins += 1,
            Some(_) => stats_b.wins += 1,
            None => unfinished += 1,
        }
    }

    writeln!(out, "Eval: {} vs {}", ai_a, ai_b)?;
    writeln!(out, "Games: {} (seed {})", games, base_seed)?;
    for (label, tier, stats) in [("A", ai_a, &stats_a), ("B", ai_b, &stats_b)] {
        writeln!(
            out,
            "{} ({}): wins {} ({:.1}%), captures {}, avg moves {:.1}",
            label,
            tier,
            stats.wins,
            stats.win_rate(games),
            stats.captures,
            stats.avg_moves(games)
        )?;
    }
    writeln!(out, "Unfinished: {}", unfinished)?;
    Ok(())
}
