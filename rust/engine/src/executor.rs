use serde::{Deserialize, Serialize};

use crate::board::PiecePosition;
use crate::errors::GameError;
use crate::game::{GameState, TurnPhase};
use crate::logger::MoveRecord;
use crate::piece::PieceRef;
use crate::player::PlayerId;
use crate::rules::{self, Move};

/// What a single executed move did. A winning move also reached home; a move
/// into the home lane can never capture, so the variants do not overlap.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved,
    Captured { piece: PieceRef },
    ReachedHome,
    WonGame { winner: PlayerId },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub player: PlayerId,
    pub mv: Move,
    pub from: PiecePosition,
    pub to: PiecePosition,
    pub outcome: MoveOutcome,
    /// Who rolls next; `None` once the game is over
    pub next_player: Option<PlayerId>,
}

impl ExecutionResult {
    pub fn captured(&self) -> Option<PieceRef> {
        match self.outcome {
            MoveOutcome::Captured { piece } => Some(piece),
            _ => None,
        }
    }

    pub fn reached_home(&self) -> bool {
        matches!(
            self.outcome,
            MoveOutcome::ReachedHome | MoveOutcome::WonGame { .. }
        )
    }

    pub fn game_over(&self) -> bool {
        matches!(self.outcome, MoveOutcome::WonGame { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.outcome {
            MoveOutcome::WonGame { winner } => Some(winner),
            _ => None,
        }
    }
}

/// Applies `mv` for `player` using the pending die value.
///
/// The move is validated against the legal set before anything changes, so an
/// error leaves `state` untouched. On success the moved piece, any captured
/// piece, the finish accounting, the game status and the move log are all
/// updated together.
pub(crate) fn execute(
    state: &mut GameState,
    player: PlayerId,
    mv: Move,
) -> Result<ExecutionResult, GameError> {
    if state.is_finished() {
        return Err(GameError::GameAlreadyFinished);
    }
    let die = state.last_die().ok_or(GameError::WrongPhase {
        expected: TurnPhase::AwaitingMoveChoice,
        actual: state.phase(),
    })?;
    rules::validate_move(state, player, die, mv)?;
    let preview = rules::preview(state, player, mv).ok_or(GameError::IllegalMove {
        piece: mv.piece,
        resulting_distance: mv.resulting_distance,
    })?;
    let seat = state.player(player)?.seat();
    let geometry = state.shared_geometry();

    if let Some(victim) = preview.captures {
        if let Some(piece) = state.player_mut(victim.player)?.piece_mut(victim.piece) {
            piece.return_to_yard();
        }
        tracing::info!(
            player,
            captured_player = victim.player,
            captured_piece = victim.piece,
            cell = ?preview.to,
            "piece captured"
        );
    }

    let owner = state.player_mut(player)?;
    if let Some(piece) = owner.piece_mut(mv.piece) {
        piece.advance_to(&geometry, seat, mv.resulting_distance);
    }
    let reached_home = preview.reaches_home();
    if reached_home {
        owner.record_finish();
    }
    let won = owner.has_won();

    let seq = state.move_log().len() as u32;
    state.push_record(MoveRecord {
        seq,
        player,
        die,
        piece: mv.piece,
        from_distance: (!preview.leaves_yard()).then_some(preview.from_distance),
        to_distance: mv.resulting_distance,
        captured: preview.captures,
    });

    let outcome = if won {
        state.finish(player);
        tracing::info!(player, moves = seq + 1, "game won");
        MoveOutcome::WonGame { winner: player }
    } else if reached_home {
        MoveOutcome::ReachedHome
    } else if let Some(piece) = preview.captures {
        MoveOutcome::Captured { piece }
    } else {
        MoveOutcome::Moved
    };

    tracing::debug!(
        player,
        piece = mv.piece,
        die = die.get(),
        to = mv.resulting_distance,
        ?outcome,
        "move executed"
    );

    Ok(ExecutionResult {
        player,
        mv,
        from: preview.from,
        to: preview.to,
        outcome,
        next_player: None,
    })
}
