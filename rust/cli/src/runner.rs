//! Plays complete computer-only games for `sim`, `eval` and `replay`.
//!
//! A game is fully determined by its player specs, its seed and its roll
//! limit: one `ChaCha20Rng` seeded from the seed drives both the die and the
//! AI's random choices, so re-running with the same inputs reproduces the
//! same move log.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use ludo_ai::{AIOpponent, create_ai};
use ludo_engine::engine::{RollTurn, initialize_game};
use ludo_engine::logger::GameRecord;
use ludo_engine::player::PlayerSpec;

use crate::error::CliError;

/// Play one game where every seat is driven by the AI of its tier.
///
/// Human seats are played at the default tier. The game stops when a player
/// wins or after `turn_limit` rolls; a cut-off game has `winner == None`.
///
/// # Example
///
/// ```rust
/// use ludo_cli::runner::play_ai_game;
/// use ludo_engine::player::{Difficulty, PlayerSpec};
///
/// let specs = [PlayerSpec::ai(Difficulty::Easy), PlayerSpec::ai(Difficulty::Hard)];
/// let a = play_ai_game("g1", &specs, 9, 5000).unwrap();
/// let b = play_ai_game("g1", &specs, 9, 5000).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn play_ai_game(
    game_id: &str,
    specs: &[PlayerSpec],
    seed: u64,
    turn_limit: u32,
) -> Result<GameRecord, CliError> {
    let mut engine = initialize_game(specs)?;
    let ais: Vec<Box<dyn AIOpponent>> = specs
        .iter()
        .map(|spec| create_ai(spec.ai_difficulty.unwrap_or_default()))
        .collect();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    while !engine.state().is_finished() && engine.state().rolls() < turn_limit {
        let player = engine.state().current_player();
        let outcome = engine.roll(player, &mut rng)?;
        if outcome.turn != RollTurn::AwaitingMove {
            continue;
        }
        let ai = ais
            .get(player)
            .ok_or_else(|| CliError::Engine(format!("no AI for player {}", player)))?;
        let mv = ai
            .select_move(engine.state(), player, &outcome.legal_moves, &mut rng)
            .or_else(|| outcome.legal_moves.first().copied())
            .ok_or_else(|| CliError::Engine(format!("{} returned no move", ai.name())))?;
        engine.choose_move(player, mv)?;
    }

    let state = engine.state();
    tracing::debug!(
        game_id,
        seed,
        rolls = state.rolls(),
        winner = ?state.winner(),
        "game simulated"
    );
    Ok(GameRecord {
        game_id: game_id.to_string(),
        seed: Some(seed),
        players: specs.to_vec(),
        moves: state.move_log().to_vec(),
        winner: state.winner(),
        rolls: state.rolls(),
        ts: None,
        meta: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_engine::player::Difficulty;

    #[test]
    fn turn_limit_cuts_the_game_off() {
        let specs = [PlayerSpec::ai(Difficulty::Medium); 4];
        let rec = play_ai_game("cut", &specs, 1, 10).unwrap();
        assert_eq!(rec.rolls, 10);
        assert_eq!(rec.winner, None);
    }

    #[test]
    fn finished_game_records_the_winner() {
        let specs = [PlayerSpec::ai(Difficulty::Hard); 2];
        let rec = play_ai_game("full", &specs, 4, 20_000).unwrap();
        let winner = rec.winner.expect("game should finish");
        let finished = rec
            .moves
            .iter()
            .filter(|m| m.player == winner && m.to_distance == 56)
            .count();
        assert_eq!(finished, 4);
        assert_eq!(rec.seed, Some(4));
    }

    #[test]
    fn different_seeds_play_different_games() {
        let specs = [PlayerSpec::ai(Difficulty::Easy); 2];
        let a = play_ai_game("a", &specs, 1, 200).unwrap();
        let b = play_ai_game("a", &specs, 2, 200).unwrap();
        assert_ne!(a.moves, b.moves);
    }
}
