use thiserror::Error;

use crate::board::Distance;
use crate::game::TurnPhase;
use crate::piece::PieceId;
use crate::player::PlayerId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    #[error("Wrong phase: expected {expected}, game is {actual}")]
    WrongPhase {
        expected: TurnPhase,
        actual: TurnPhase,
    },
    #[error("Illegal move: piece {piece} to distance {resulting_distance}")]
    IllegalMove {
        piece: PieceId,
        resulting_distance: Distance,
    },
    #[error("Invalid player count: {0} (expected 2 to 4)")]
    InvalidPlayerCount(usize),
    #[error("Game already finished")]
    GameAlreadyFinished,
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
}
