use serde::{Deserialize, Serialize};

use crate::board::{BoardGeometry, Cell, Distance, PiecePosition, Seat};
use crate::player::PlayerId;

/// Pieces each player starts with in the yard.
pub const PIECES_PER_PLAYER: usize = 4;

/// Index of a piece within its owner's set (0-3).
pub type PieceId = usize;

/// Globally identifies a piece: owner plus index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PieceRef {
    pub player: PlayerId,
    pub piece: PieceId,
}

/// A single playing piece.
///
/// `position` is always `geometry.project(seat, distance_traveled)` once the
/// piece has left the yard; both fields change together through the
/// crate-private mutators used by the move executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    position: PiecePosition,
    distance_traveled: Distance,
}

impl Piece {
    pub(crate) fn new(id: PieceId) -> Self {
        Self {
            id,
            position: PiecePosition::InYard,
            distance_traveled: 0,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn position(&self) -> PiecePosition {
        self.position
    }

    pub fn distance_traveled(&self) -> Distance {
        self.distance_traveled
    }

    pub fn is_in_yard(&self) -> bool {
        self.position == PiecePosition::InYard
    }

    pub fn is_finished(&self) -> bool {
        self.position == PiecePosition::Finished
    }

    pub fn track_cell(&self) -> Option<Cell> {
        self.position.track_cell()
    }

    pub(crate) fn advance_to(&mut self, geometry: &BoardGeometry, seat: Seat, distance: Distance) {
        self.distance_traveled = distance;
        self.position = geometry.project(seat, distance);
    }

    pub(crate) fn return_to_yard(&mut self) {
        self.distance_traveled = 0;
        self.position = PiecePosition::InYard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_capture_keep_fields_in_step() {
        let board = BoardGeometry::standard();
        let mut p = Piece::new(2);
        assert!(p.is_in_yard());
        p.advance_to(&board, 1, 0);
        assert_eq!(p.position(), PiecePosition::OnTrack(13));
        assert_eq!(p.distance_traveled(), 0);
        p.advance_to(&board, 1, 52);
        assert_eq!(p.position(), PiecePosition::InHomeLane(1));
        p.return_to_yard();
        assert_eq!(p.position(), PiecePosition::InYard);
        assert_eq!(p.distance_traveled(), 0);
    }
}
