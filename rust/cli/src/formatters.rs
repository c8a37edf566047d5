//! Piece, move, and board formatters for terminal display.
//!
//! Pure functions turning engine values into the short strings the `play` and
//! `replay` commands print.
//!
//! ## Example
//!
//! ```rust
//! use ludo_cli::formatters::format_position;
//! use ludo_engine::board::PiecePosition;
//!
//! assert_eq!(format_position(PiecePosition::OnTrack(13)), "cell 13");
//! assert_eq!(format_position(PiecePosition::InHomeLane(2)), "lane 3");
//! ```

use ludo_engine::board::PiecePosition;
use ludo_engine::game::GameState;
use ludo_engine::player::{Player, PlayerId};
use ludo_engine::rules::{self, Move};

/// `yard`, `cell N`, `lane N` (1-based slot), or `home`.
pub fn format_position(position: PiecePosition) -> String {
    match position {
        PiecePosition::InYard => "yard".to_string(),
        PiecePosition::OnTrack(cell) => format!("cell {}", cell),
        PiecePosition::InHomeLane(slot) => format!("lane {}", slot + 1),
        PiecePosition::Finished => "home".to_string(),
    }
}

pub fn format_player(player: PlayerId) -> String {
    format!("P{}", player)
}

/// Describe a candidate move in the current state, e.g.
/// `piece 2: cell 11 -> cell 16 (captures P1 piece 0)`.
///
/// Falls back to the raw distance when the move does not describe one of the
/// player's pieces.
pub fn format_move(state: &GameState, player: PlayerId, mv: Move) -> String {
    let Some(preview) = rules::preview(state, player, mv) else {
        return format!("piece {}: -> distance {}", mv.piece, mv.resulting_distance);
    };
    let mut line = format!(
        "piece {}: {} -> {}",
        mv.piece,
        format_position(preview.from),
        format_position(preview.to)
    );
    if let Some(victim) = preview.captures {
        line.push_str(&format!(
            " (captures {} piece {})",
            format_player(victim.player),
            victim.piece
        ));
    }
    line
}

/// One line per player: controller, piece positions and finished count.
pub fn format_board(state: &GameState) -> String {
    state
        .players()
        .iter()
        .map(format_player_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_player_line(player: &Player) -> String {
    let controller = match player.ai_difficulty() {
        Some(difficulty) => format!("ai:{}", difficulty),
        None => "human".to_string(),
    };
    let pieces = player
        .pieces()
        .iter()
        .map(|p| format_position(p.position()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} ({}) [{}] home {}/{}",
        format_player(player.id()),
        controller,
        pieces,
        player.finished_count(),
        player.pieces().len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_engine::dice::DieValue;
    use ludo_engine::engine::initialize_game;
    use ludo_engine::player::{Difficulty, PlayerSpec};

    #[test]
    fn positions_are_short_words() {
        assert_eq!(format_position(PiecePosition::InYard), "yard");
        assert_eq!(format_position(PiecePosition::Finished), "home");
        assert_eq!(format_position(PiecePosition::InHomeLane(0)), "lane 1");
    }

    #[test]
    fn leaving_the_yard_names_the_entry_cell() {
        let engine =
            initialize_game(&[PlayerSpec::human(), PlayerSpec::ai(Difficulty::Easy)]).unwrap();
        let moves = engine.legal_moves(1, DieValue::SIX).unwrap();
        // two-player games seat the second player opposite, entering on cell 26
        assert_eq!(format_move(engine.state(), 1, moves[0]), "piece 0: yard -> cell 26");
    }

    #[test]
    fn board_lists_every_player() {
        let engine =
            initialize_game(&[PlayerSpec::human(), PlayerSpec::ai(Difficulty::Hard)]).unwrap();
        let board = format_board(engine.state());
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "P0 (human) [yard, yard, yard, yard] home 0/4");
        assert!(lines[1].starts_with("P1 (ai:hard)"));
    }
}
