//! # Play Command
//!
//! Interactive game against AI opponents.
//!
//! Seat 0 is the human; every other seat is played by the configured AI tier.
//! Dice are rolled automatically. When the human has legal moves they are
//! listed with numbers and the choice is read from stdin; `q` (or end of
//! input) quits. With `--watch` every seat is an AI and the whole game is
//! printed without prompting.

use std::io::{BufRead, Write};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use ludo_ai::{AIOpponent, create_ai};
use ludo_engine::engine::{Engine, RollTurn, initialize_game};
use ludo_engine::player::PlayerId;
use ludo_engine::rules::Move;

use crate::config::{self, ConfigOverrides};
use crate::error::CliError;
use crate::formatters::{format_board, format_move, format_player};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_move_choice};

/// Handle the play command.
///
/// # Arguments
///
/// * `overrides` - Command-line values for players, difficulty, seed and turn limit
/// * `watch` - Let the AI play every seat
/// * `out` - Output stream for game display
/// * `err` - Error stream for warnings and errors
/// * `stdin` - Input stream for move choices
///
/// # Returns
///
/// * `Ok(())` when the game ends, hits the turn limit, or the player quits
/// * `Err(CliError)` on invalid configuration, engine or I/O errors
pub fn handle_play_command(
    overrides: ConfigOverrides,
    watch: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = config::load_with_overrides(overrides)?.config;
    let specs = if watch {
        cfg.ai_players()
    } else {
        cfg.human_vs_ai()
    };
    let seed = cfg.seed.unwrap_or_else(rand::random);

    let mut engine = initialize_game(&specs)?;
    let ais: Vec<Option<Box<dyn AIOpponent>>> = engine
        .state()
        .players()
        .iter()
        .map(|p| p.ai_difficulty().map(create_ai))
        .collect();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    writeln!(
        out,
        "play: players={} difficulty={} seed={}{}",
        cfg.players,
        cfg.difficulty,
        seed,
        if watch { " (watch)" } else { "" }
    )?;
    writeln!(out, "{}", format_board(engine.state()))?;

    loop {
        if let Some(winner) = engine.state().winner() {
            writeln!(out, "{}", format_board(engine.state()))?;
            writeln!(out, "Winner: {}", format_player(winner))?;
            return Ok(());
        }
        if engine.state().rolls() >= cfg.turn_limit {
            writeln!(out, "Turn limit of {} rolls reached", cfg.turn_limit)?;
            return Ok(());
        }

        let player = engine.state().current_player();
        let outcome = engine.roll(player, &mut rng)?;
        writeln!(out, "{} rolled {}", format_player(player), outcome.die)?;
        match outcome.turn {
            RollTurn::AwaitingMove => {}
            RollTurn::NoLegalMoves { .. } => {
                writeln!(out, "  no legal moves")?;
                continue;
            }
            RollTurn::ThreeSixes { .. } => {
                writeln!(out, "  third six in a row, turn forfeited")?;
                continue;
            }
        }

        let mv = match ais.get(player).and_then(Option::as_ref) {
            Some(ai) => ai
                .select_move(engine.state(), player, &outcome.legal_moves, &mut rng)
                .or_else(|| outcome.legal_moves.first().copied())
                .ok_or_else(|| CliError::Engine(format!("{} returned no move", ai.name())))?,
            None => {
                match choose_human_move(&engine, player, &outcome.legal_moves, out, err, stdin)? {
                    Some(mv) => mv,
                    None => {
                        writeln!(out, "Quit after {} rolls", engine.state().rolls())?;
                        return Ok(());
                    }
                }
            }
        };

        let description = format_move(engine.state(), player, mv);
        let result = engine.choose_move(player, mv)?;
        writeln!(out, "  {} moves {}", format_player(player), description)?;
        if result.reached_home() {
            writeln!(out, "  piece {} reached home", mv.piece)?;
        }
        if result.next_player == Some(player) {
            writeln!(out, "  {} rolls again", format_player(player))?;
        }
    }
}

/// Prompt until a valid choice is made. `None` means the player quit.
fn choose_human_move(
    engine: &Engine,
    player: PlayerId,
    legal: &[Move],
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Option<Move>, CliError> {
    writeln!(out, "{}", format_board(engine.state()))?;
    for (i, mv) in legal.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, format_move(engine.state(), player, *mv))?;
    }
    loop {
        ui::prompt(out, &format!("Choose move (1-{}, q to quit): ", legal.len()))?;
        let Some(input) = read_stdin_line(stdin) else {
            writeln!(out)?;
            return Ok(None);
        };
        match parse_move_choice(&input, legal.len()) {
            ParseResult::Choice(i) => return Ok(legal.get(i).copied()),
            ParseResult::Quit => return Ok(None),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}
