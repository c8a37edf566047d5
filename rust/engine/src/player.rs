use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::Seat;
use crate::piece::{Piece, PieceId, PIECES_PER_PLAYER};

/// Index of a player in turn order (0-based).
pub type PlayerId = usize;

/// Strength tier of a computer-controlled player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Random-heavy play with a fixed home/capture preference
    Easy,
    /// Scores every move and picks the best one
    #[default]
    Medium,
    /// Medium scoring plus opponent blocking and grouping
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// How a seat is controlled, supplied when a game is created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub is_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_difficulty: Option<Difficulty>,
}

impl PlayerSpec {
    pub fn human() -> Self {
        Self {
            is_ai: false,
            ai_difficulty: None,
        }
    }

    pub fn ai(difficulty: Difficulty) -> Self {
        Self {
            is_ai: true,
            ai_difficulty: Some(difficulty),
        }
    }
}

/// A participant with its four pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    seat: Seat,
    is_ai: bool,
    ai_difficulty: Option<Difficulty>,
    pieces: [Piece; PIECES_PER_PLAYER],
    finished_count: u8,
}

impl Player {
    pub(crate) fn new(id: PlayerId, seat: Seat, spec: PlayerSpec) -> Self {
        // an AI seat without an explicit tier plays at the default tier
        let ai_difficulty = if spec.is_ai {
            Some(spec.ai_difficulty.unwrap_or_default())
        } else {
            None
        };
        Self {
            id,
            seat,
            is_ai: spec.is_ai,
            ai_difficulty,
            pieces: std::array::from_fn(Piece::new),
            finished_count: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn is_ai(&self) -> bool {
        self.is_ai
    }

    pub fn ai_difficulty(&self) -> Option<Difficulty> {
        self.ai_difficulty
    }

    pub fn spec(&self) -> PlayerSpec {
        PlayerSpec {
            is_ai: self.is_ai,
            ai_difficulty: self.ai_difficulty,
        }
    }

    pub fn pieces(&self) -> &[Piece; PIECES_PER_PLAYER] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn finished_count(&self) -> u8 {
        self.finished_count
    }

    pub fn has_won(&self) -> bool {
        self.finished_count as usize == PIECES_PER_PLAYER
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id)
    }

    pub(crate) fn record_finish(&mut self) {
        self.finished_count = self.finished_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_starts_with_four_yard_pieces() {
        let p = Player::new(1, 2, PlayerSpec::human());
        assert_eq!(p.pieces().len(), 4);
        assert!(p.pieces().iter().all(|pc| pc.is_in_yard()));
        assert_eq!(p.finished_count(), 0);
        assert!(!p.has_won());
        assert_eq!(p.ai_difficulty(), None);
    }

    #[test]
    fn ai_without_tier_defaults_to_medium() {
        let spec = PlayerSpec {
            is_ai: true,
            ai_difficulty: None,
        };
        let p = Player::new(0, 0, spec);
        assert_eq!(p.ai_difficulty(), Some(Difficulty::Medium));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }
}
