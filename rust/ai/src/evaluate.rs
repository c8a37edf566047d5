//! Move scoring shared by the Medium and Hard tiers.
//!
//! Every weight pushes in a fixed direction: more progress, reaching home,
//! capturing, leaving the yard and landing on protected cells all score higher;
//! stopping on an unprotected cell an opponent can reach next roll scores lower.
//! The tactical extras (blocking and grouping) are only applied for Hard.

use std::collections::BTreeSet;

use ludo_engine::board::{Cell, PiecePosition};
use ludo_engine::game::GameState;
use ludo_engine::player::PlayerId;
use ludo_engine::rules::{self, Move};

/// Points per unit of distance the moved piece will have travelled.
pub const PROGRESS_WEIGHT: i32 = 2;
pub const HOME_BONUS: i32 = 100;
pub const CAPTURE_BONUS: i32 = 50;
pub const LEAVE_YARD_BONUS: i32 = 20;
pub const PROTECTED_BONUS: i32 = 10;
pub const EXPOSED_PENALTY: i32 = 20;
/// Hard only: landing on a cell an opponent could land on next roll.
pub const BLOCK_BONUS: i32 = 15;
/// Hard only: landing next to another of the player's own track pieces.
pub const GROUPING_BONUS: i32 = 8;

/// Scores candidate moves for one player against one board snapshot.
///
/// Opponent reach is computed once on construction, so scoring a whole legal
/// set costs one pass over the opponents plus one preview per move. Reach
/// ignores the opponents' own pieces in the way, so a cell emptied by a
/// capture still counts as threatened.
///
/// # Examples
///
/// ```rust
/// use ludo_ai::evaluate::{Evaluator, LEAVE_YARD_BONUS, PROTECTED_BONUS};
/// use ludo_engine::dice::DieValue;
/// use ludo_engine::engine::initialize_game;
/// use ludo_engine::player::PlayerSpec;
///
/// let engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).unwrap();
/// let moves = engine.legal_moves(0, DieValue::SIX).unwrap();
/// let eval = Evaluator::new(engine.state(), 0, false);
/// // leaving the yard lands on the entry cell, which is safe
/// assert_eq!(eval.score(moves[0]), Some(LEAVE_YARD_BONUS + PROTECTED_BONUS));
/// ```
#[derive(Debug)]
pub struct Evaluator<'a> {
    game: &'a GameState,
    player: PlayerId,
    tactical: bool,
    threatened: BTreeSet<Cell>,
}

impl<'a> Evaluator<'a> {
    /// `tactical` enables the Hard-tier blocking and grouping terms.
    pub fn new(game: &'a GameState, player: PlayerId, tactical: bool) -> Self {
        let threatened = game
            .players()
            .iter()
            .filter(|p| p.id() != player && !p.has_won())
            .flat_map(|p| rules::reachable_cells(game, p.id()))
            .collect();
        Self {
            game,
            player,
            tactical,
            threatened,
        }
    }

    /// Track cells some opponent piece can reach with its next roll.
    pub fn threatened_cells(&self) -> &BTreeSet<Cell> {
        &self.threatened
    }

    /// Returns `None` when the move does not describe one of the player's pieces.
    pub fn score(&self, mv: Move) -> Option<i32> {
        let preview = rules::preview(self.game, self.player, mv)?;
        let geometry = self.game.geometry();

        let mut score = PROGRESS_WEIGHT * i32::from(mv.resulting_distance);
        if preview.reaches_home() {
            score += HOME_BONUS;
        }
        if preview.captures.is_some() {
            score += CAPTURE_BONUS;
        }
        if preview.leaves_yard() {
            score += LEAVE_YARD_BONUS;
        }

        if let PiecePosition::OnTrack(cell) = preview.to {
            let threatened = self.threatened.contains(&cell);
            if geometry.is_protected(cell) {
                score += PROTECTED_BONUS;
            } else if threatened {
                score -= EXPOSED_PENALTY;
            }
            if self.tactical {
                if threatened {
                    score += BLOCK_BONUS;
                }
                if self.groups_with_own(mv, cell) {
                    score += GROUPING_BONUS;
                }
            }
        }
        Some(score)
    }

    fn groups_with_own(&self, mv: Move, cell: Cell) -> bool {
        let Ok(owner) = self.game.player(self.player) else {
            return false;
        };
        let len = self.game.geometry().track_length();
        let before = (cell + len - 1) % len;
        let after = (cell + 1) % len;
        owner
            .pieces()
            .iter()
            .filter(|p| p.id() != mv.piece)
            .filter_map(|p| p.track_cell())
            .any(|c| c == before || c == after)
    }
}
