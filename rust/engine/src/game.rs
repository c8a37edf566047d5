use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::board::{BoardGeometry, Cell};
use crate::dice::DieValue;
use crate::errors::GameError;
use crate::logger::MoveRecord;
use crate::piece::PieceRef;
use crate::player::{Player, PlayerId, PlayerSpec};
use crate::rules::Move;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Phase of the turn state machine, used in error reports.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    WaitingForRoll,
    AwaitingMoveChoice,
    Finished,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnPhase::WaitingForRoll => "waiting for roll",
            TurnPhase::AwaitingMoveChoice => "awaiting move choice",
            TurnPhase::Finished => "finished",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameStatus {
    WaitingForRoll,
    AwaitingMoveChoice,
    Finished { winner: PlayerId },
}

impl GameStatus {
    pub fn phase(&self) -> TurnPhase {
        match self {
            GameStatus::WaitingForRoll => TurnPhase::WaitingForRoll,
            GameStatus::AwaitingMoveChoice => TurnPhase::AwaitingMoveChoice,
            GameStatus::Finished { .. } => TurnPhase::Finished,
        }
    }
}

/// Complete state of one game: players and pieces, whose turn it is, the
/// dice bookkeeping and the append-only move log.
///
/// Read access is public; every mutation goes through the crate's turn
/// controller and move executor.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    #[serde(skip)]
    geometry: Arc<BoardGeometry>,
    players: Vec<Player>,
    current_player: PlayerId,
    last_die: Option<DieValue>,
    consecutive_sixes: u8,
    status: GameStatus,
    /// Legal moves for the pending roll, empty unless awaiting a choice
    pending_moves: Vec<Move>,
    /// Number of rolls taken so far, across all players
    rolls: u32,
    move_log: Vec<MoveRecord>,
}

impl GameState {
    pub fn new(geometry: Arc<BoardGeometry>, specs: &[PlayerSpec]) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&specs.len()) {
            return Err(GameError::InvalidPlayerCount(specs.len()));
        }
        let seats = geometry
            .seats_for(specs.len())
            .ok_or(GameError::InvalidPlayerCount(specs.len()))?;
        let players = specs
            .iter()
            .zip(seats)
            .enumerate()
            .map(|(id, (spec, seat))| Player::new(id, seat, *spec))
            .collect();
        Ok(Self {
            geometry,
            players,
            current_player: 0,
            last_die: None,
            consecutive_sixes: 0,
            status: GameStatus::WaitingForRoll,
            pending_moves: Vec::new(),
            rolls: 0,
            move_log: Vec::new(),
        })
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn shared_geometry(&self) -> Arc<BoardGeometry> {
        Arc::clone(&self.geometry)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id).ok_or(GameError::UnknownPlayer(id))
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn last_die(&self) -> Option<DieValue> {
        self.last_die
    }

    pub fn consecutive_sixes(&self) -> u8 {
        self.consecutive_sixes
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn phase(&self) -> TurnPhase {
        self.status.phase()
    }

    pub fn pending_moves(&self) -> &[Move] {
        &self.pending_moves
    }

    pub fn rolls(&self) -> u32 {
        self.rolls
    }

    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Pieces of every player standing on a track cell.
    pub fn occupants(&self, cell: Cell) -> impl Iterator<Item = PieceRef> + '_ {
        self.players.iter().flat_map(move |player| {
            player
                .pieces()
                .iter()
                .filter(move |piece| piece.track_cell() == Some(cell))
                .map(move |piece| PieceRef {
                    player: player.id(),
                    piece: piece.id(),
                })
        })
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players.get_mut(id).ok_or(GameError::UnknownPlayer(id))
    }

    /// Records a fresh roll and updates the six counter. Returns the new count.
    pub(crate) fn record_roll(&mut self, die: DieValue) -> u8 {
        self.rolls = self.rolls.saturating_add(1);
        self.last_die = Some(die);
        if die.is_six() {
            self.consecutive_sixes += 1;
        } else {
            self.consecutive_sixes = 0;
        }
        self.consecutive_sixes
    }

    pub(crate) fn await_choice(&mut self, moves: Vec<Move>) {
        self.pending_moves = moves;
        self.status = GameStatus::AwaitingMoveChoice;
    }

    /// Same player rolls again; the six counter is kept.
    pub(crate) fn retain_turn(&mut self) {
        self.pending_moves.clear();
        self.status = GameStatus::WaitingForRoll;
    }

    /// Hands the turn to the next player who has not finished, wrapping around.
    pub(crate) fn advance_turn(&mut self) -> PlayerId {
        let count = self.players.len();
        let mut next = self.current_player;
        for _ in 0..count {
            next = (next + 1) % count;
            if !self.players[next].has_won() {
                break;
            }
        }
        self.current_player = next;
        self.consecutive_sixes = 0;
        self.pending_moves.clear();
        self.status = GameStatus::WaitingForRoll;
        next
    }

    pub(crate) fn finish(&mut self, winner: PlayerId) {
        self.pending_moves.clear();
        self.status = GameStatus::Finished { winner };
    }

    pub(crate) fn push_record(&mut self, record: MoveRecord) {
        self.move_log.push(record);
    }
}
