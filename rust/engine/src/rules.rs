use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::board::{Cell, Distance, PiecePosition};
use crate::dice::DieValue;
use crate::errors::GameError;
use crate::game::GameState;
use crate::piece::{PieceId, PieceRef};
use crate::player::{Player, PlayerId};

/// A candidate move: which piece, and the distance it ends on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub resulting_distance: Distance,
}

/// What a move would do to the board, computed without mutating anything.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MovePreview {
    pub piece: PieceRef,
    pub from: PiecePosition,
    pub from_distance: Distance,
    pub to: PiecePosition,
    pub to_distance: Distance,
    /// Opponent piece sent back to its yard, if any
    pub captures: Option<PieceRef>,
}

impl MovePreview {
    pub fn leaves_yard(&self) -> bool {
        self.from == PiecePosition::InYard
    }

    pub fn reaches_home(&self) -> bool {
        self.to == PiecePosition::Finished
    }
}

/// Computes every legal move for `player` with `die`, ordered by piece id.
///
/// Rules:
/// - a yard piece may leave only on a six, landing on the seat's entry cell;
/// - a board piece moves exactly `die` steps and may not overshoot the end of
///   its home lane;
/// - no move may land on a track cell or lane slot held by another piece of
///   the same player;
/// - landing on an opponent is allowed (a capture unless the cell is
///   protected).
///
/// # Examples
///
/// ```
/// use ludo_engine::dice::DieValue;
/// use ludo_engine::engine::initialize_game;
/// use ludo_engine::player::PlayerSpec;
/// use ludo_engine::rules::{legal_moves, Move};
///
/// let engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).unwrap();
/// let die = DieValue::new(3).unwrap();
/// assert!(legal_moves(engine.state(), 0, die).unwrap().is_empty());
///
/// let moves = legal_moves(engine.state(), 0, DieValue::SIX).unwrap();
/// assert_eq!(moves.len(), 4);
/// assert_eq!(moves[0], Move { piece: 0, resulting_distance: 0 });
/// ```
pub fn legal_moves(
    state: &GameState,
    player: PlayerId,
    die: DieValue,
) -> Result<Vec<Move>, GameError> {
    let geometry = state.geometry();
    let owner = state.player(player)?;
    let steps = Distance::from(die.get());

    let mut moves = Vec::new();
    for piece in owner.pieces() {
        let target = match piece.position() {
            PiecePosition::Finished => continue,
            PiecePosition::InYard if die.is_six() => 0,
            PiecePosition::InYard => continue,
            PiecePosition::OnTrack(_) | PiecePosition::InHomeLane(_) => {
                let target = piece.distance_traveled() + steps;
                if target > geometry.total_path() {
                    continue;
                }
                target
            }
        };
        let landing = geometry.project(owner.seat(), target);
        if occupied_by_own(owner, piece.id(), landing) {
            continue;
        }
        moves.push(Move {
            piece: piece.id(),
            resulting_distance: target,
        });
    }
    Ok(moves)
}

fn occupied_by_own(owner: &Player, moving: PieceId, landing: PiecePosition) -> bool {
    if landing == PiecePosition::Finished {
        return false;
    }
    owner
        .pieces()
        .iter()
        .any(|other| other.id() != moving && other.position() == landing)
}

/// Checks that `mv` is one of the legal moves for this roll.
pub fn validate_move(
    state: &GameState,
    player: PlayerId,
    die: DieValue,
    mv: Move,
) -> Result<(), GameError> {
    if legal_moves(state, player, die)?.contains(&mv) {
        Ok(())
    } else {
        Err(GameError::IllegalMove {
            piece: mv.piece,
            resulting_distance: mv.resulting_distance,
        })
    }
}

/// Describes the effect of `mv` without checking it against a roll.
/// Returns `None` when the player or piece does not exist.
pub fn preview(state: &GameState, player: PlayerId, mv: Move) -> Option<MovePreview> {
    let geometry = state.geometry();
    let owner = state.players().get(player)?;
    let piece = owner.piece(mv.piece)?;
    let to = geometry.project(owner.seat(), mv.resulting_distance);

    let captures = match to {
        PiecePosition::OnTrack(cell) if !geometry.is_protected(cell) => {
            state.occupants(cell).find(|occ| occ.player != player)
        }
        _ => None,
    };

    Some(MovePreview {
        piece: PieceRef {
            player,
            piece: mv.piece,
        },
        from: piece.position(),
        from_distance: piece.distance_traveled(),
        to,
        to_distance: mv.resulting_distance,
        captures,
    })
}

/// Track cells one of `player`'s pieces could reach with its next roll.
///
/// Unlike [`legal_moves`] this ignores the player's own pieces standing in
/// the way: a cell held by one of them is still reachable once that piece
/// has been captured.
pub fn reachable_cells(state: &GameState, player: PlayerId) -> BTreeSet<Cell> {
    let Ok(owner) = state.player(player) else {
        return BTreeSet::new();
    };
    let geometry = state.geometry();
    let seat = owner.seat();
    let mut cells = BTreeSet::new();
    for piece in owner.pieces() {
        match piece.position() {
            PiecePosition::Finished => {}
            PiecePosition::InYard => {
                cells.insert(geometry.entry_cell(seat));
            }
            PiecePosition::OnTrack(_) | PiecePosition::InHomeLane(_) => {
                let targets = DieValue::faces()
                    .map(|die| piece.distance_traveled() + Distance::from(die.get()))
                    .filter(|&target| target <= geometry.total_path());
                cells.extend(targets.filter_map(|t| geometry.project(seat, t).track_cell()));
            }
        }
    }
    cells
}
