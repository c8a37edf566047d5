use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::board::BoardGeometry;
use crate::dice::DieValue;
use crate::errors::GameError;
use crate::executor::{self, ExecutionResult};
use crate::game::{GameState, TurnPhase};
use crate::player::{PlayerId, PlayerSpec};
use crate::rules::{self, Move, MovePreview};

/// Rolling this many sixes in a row forfeits the roll's move.
pub const MAX_CONSECUTIVE_SIXES: u8 = 3;

/// What happens to the turn after a roll.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollTurn {
    /// The roller must now choose one of the legal moves
    AwaitingMove,
    /// Nothing could move; `next` rolls (the same player after a six)
    NoLegalMoves { next: PlayerId },
    /// Third six in a row: the move is forfeited and the turn passes to `next`
    ThreeSixes { next: PlayerId },
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub player: PlayerId,
    pub die: DieValue,
    pub legal_moves: Vec<Move>,
    pub turn: RollTurn,
}

/// Turn controller for one game. Owns the [`GameState`] and is the only way to
/// change it: [`roll`](Engine::roll) then [`choose_move`](Engine::choose_move),
/// repeated until a player has all four pieces home.
///
/// The engine is synchronous and holds no shared state; a host running several
/// games keeps one `Engine` per game and serialises calls into each.
///
/// # Examples
///
/// ```
/// use ludo_engine::dice::DieValue;
/// use ludo_engine::engine::{initialize_game, RollTurn};
/// use ludo_engine::player::PlayerSpec;
///
/// let mut engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).unwrap();
///
/// // A six lets player 0 bring a piece out, and roll again afterwards.
/// let outcome = engine.roll_with(0, DieValue::SIX).unwrap();
/// assert_eq!(outcome.turn, RollTurn::AwaitingMove);
/// let result = engine.choose_move(0, outcome.legal_moves[0]).unwrap();
/// assert_eq!(result.next_player, Some(0));
///
/// let outcome = engine.roll_with(0, DieValue::new(3).unwrap()).unwrap();
/// engine.choose_move(0, outcome.legal_moves[0]).unwrap();
/// let piece = engine.state().player(0).unwrap().piece(0).unwrap();
/// assert_eq!(piece.distance_traveled(), 3);
/// assert_eq!(engine.state().current_player(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
}

/// Starts a game on the standard board.
pub fn initialize_game(players: &[PlayerSpec]) -> Result<Engine, GameError> {
    Engine::new(players)
}

impl Engine {
    pub fn new(players: &[PlayerSpec]) -> Result<Self, GameError> {
        Self::with_geometry(Arc::new(BoardGeometry::standard()), players)
    }

    pub fn with_geometry(
        geometry: Arc<BoardGeometry>,
        players: &[PlayerSpec],
    ) -> Result<Self, GameError> {
        let state = GameState::new(geometry, players)?;
        tracing::debug!(players = players.len(), "game initialized");
        Ok(Self { state })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state for rendering or persistence.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn legal_moves(&self, player: PlayerId, die: DieValue) -> Result<Vec<Move>, GameError> {
        rules::legal_moves(&self.state, player, die)
    }

    pub fn preview(&self, player: PlayerId, mv: Move) -> Option<MovePreview> {
        rules::preview(&self.state, player, mv)
    }

    /// Rolls the die for `player` with the injected RNG.
    pub fn roll<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<RollOutcome, GameError> {
        self.check_turn(player, TurnPhase::WaitingForRoll)?;
        self.roll_with(player, DieValue::roll(rng))
    }

    /// Applies a die value rolled elsewhere (a physical die, a server, a replay).
    pub fn roll_with(&mut self, player: PlayerId, die: DieValue) -> Result<RollOutcome, GameError> {
        self.check_turn(player, TurnPhase::WaitingForRoll)?;
        let sixes = self.state.record_roll(die);
        tracing::debug!(player, die = die.get(), sixes, "dice rolled");

        if sixes >= MAX_CONSECUTIVE_SIXES {
            let next = self.state.advance_turn();
            tracing::debug!(player, next, "third consecutive six, move forfeited");
            return Ok(RollOutcome {
                player,
                die,
                legal_moves: Vec::new(),
                turn: RollTurn::ThreeSixes { next },
            });
        }

        let legal_moves = rules::legal_moves(&self.state, player, die)?;
        if legal_moves.is_empty() {
            let next = if die.is_six() {
                self.state.retain_turn();
                player
            } else {
                self.state.advance_turn()
            };
            tracing::debug!(player, next, "no legal moves");
            return Ok(RollOutcome {
                player,
                die,
                legal_moves,
                turn: RollTurn::NoLegalMoves { next },
            });
        }

        self.state.await_choice(legal_moves.clone());
        Ok(RollOutcome {
            player,
            die,
            legal_moves,
            turn: RollTurn::AwaitingMove,
        })
    }

    /// Executes the chosen move for the pending roll and decides who rolls next:
    /// the same player after a six or a capture, otherwise the next player.
    pub fn choose_move(&mut self, player: PlayerId, mv: Move) -> Result<ExecutionResult, GameError> {
        self.check_turn(player, TurnPhase::AwaitingMoveChoice)?;
        let mut result = executor::execute(&mut self.state, player, mv)?;
        if result.game_over() {
            return Ok(result);
        }

        let rolled_six = self.state.last_die().is_some_and(DieValue::is_six);
        let next = if rolled_six || result.captured().is_some() {
            self.state.retain_turn();
            player
        } else {
            self.state.advance_turn()
        };
        result.next_player = Some(next);
        Ok(result)
    }

    fn check_turn(&self, player: PlayerId, phase: TurnPhase) -> Result<(), GameError> {
        if self.state.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }
        self.state.player(player)?;
        let expected = self.state.current_player();
        if player != expected {
            return Err(GameError::NotYourTurn {
                expected,
                actual: player,
            });
        }
        let actual = self.state.phase();
        if actual != phase {
            return Err(GameError::WrongPhase {
                expected: phase,
                actual,
            });
        }
        Ok(())
    }
}
