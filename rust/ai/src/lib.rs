//! # ludo-ai: AI Opponents for the Race Board Game
//!
//! Computer players for the Ludo-family rules engine. Every tier picks one
//! move from a legal-move set produced by the engine, so an AI can never make
//! an illegal move and never mutates game state.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`easy`] - Priority-list AI with frequent random moves
//! - [`heuristic`] - Scoring AI used for the Medium and Hard tiers
//! - [`evaluate`] - Move scoring weights and the per-decision evaluator
//! - [`create_ai`] - Factory mapping a [`Difficulty`] to an opponent
//!
//! ## Quick Start
//!
//! ```rust
//! use ludo_ai::{create_ai, AIOpponent};
//! use ludo_engine::engine::{initialize_game, RollTurn};
//! use ludo_engine::player::{Difficulty, PlayerSpec};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let ai = create_ai(Difficulty::Hard);
//! let mut engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::ai(Difficulty::Hard)]).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let player = engine.state().current_player();
//! let outcome = engine.roll(player, &mut rng).unwrap();
//! if outcome.turn == RollTurn::AwaitingMove {
//!     let mv = ai
//!         .select_move(engine.state(), player, &outcome.legal_moves, &mut rng)
//!         .expect("non-empty legal set");
//!     engine.choose_move(player, mv).unwrap();
//! }
//! ```
//!
//! ## Difficulty Tiers
//!
//! - `Easy` - [`easy::EasyAI`], random 30% of the time
//! - `Medium` - [`heuristic::HeuristicAI::medium`], random 10% of the time
//! - `Hard` - [`heuristic::HeuristicAI::hard`], adds blocking and grouping, random 5% of the time

use rand::{Rng, RngCore};

use ludo_engine::game::GameState;
use ludo_engine::player::{Difficulty, PlayerId};
use ludo_engine::rules::Move;

pub mod easy;
pub mod evaluate;
pub mod heuristic;

pub const DEFAULT_EASY_RANDOM_FACTOR: f64 = 0.30;
pub const DEFAULT_MEDIUM_RANDOM_FACTOR: f64 = 0.10;
pub const DEFAULT_HARD_RANDOM_FACTOR: f64 = 0.05;

/// Trait defining the interface for AI opponents.
/// Implementors must provide methods for move selection and identification.
///
/// # Required Methods
///
/// - [`select_move`](AIOpponent::select_move) - Choose one move from the legal set
/// - [`name`](AIOpponent::name) - Return the AI's identifier/name
///
/// # Example Implementation
///
/// ```rust
/// use ludo_ai::AIOpponent;
/// use ludo_engine::game::GameState;
/// use ludo_engine::rules::Move;
/// use rand::RngCore;
///
/// struct FurthestBack;
///
/// impl AIOpponent for FurthestBack {
///     fn select_move(
///         &self,
///         _game: &GameState,
///         _player: usize,
///         legal: &[Move],
///         _rng: &mut dyn RngCore,
///     ) -> Option<Move> {
///         legal.iter().copied().min_by_key(|m| m.resulting_distance)
///     }
///
///     fn name(&self) -> &str {
///         "FurthestBack"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Choose a move for `player` from `legal`.
    ///
    /// # Arguments
    ///
    /// * `game` - Current game state (read only)
    /// * `player` - The player the move is for
    /// * `legal` - Legal moves for the pending roll, in generation order
    /// * `rng` - Injected randomness for the tier's random factor
    ///
    /// # Returns
    ///
    /// A member of `legal`, or `None` only when `legal` is empty
    fn select_move(
        &self,
        game: &GameState,
        player: PlayerId,
        legal: &[Move],
        rng: &mut dyn RngCore,
    ) -> Option<Move>;

    /// Return the name/identifier of this AI implementation.
    fn name(&self) -> &str;
}

/// Factory function to create the AI opponent for a difficulty tier.
///
/// # Example
///
/// ```rust
/// use ludo_ai::create_ai;
/// use ludo_engine::player::Difficulty;
///
/// let ai = create_ai(Difficulty::Easy);
/// assert_eq!(ai.name(), "EasyAI");
/// ```
pub fn create_ai(difficulty: Difficulty) -> Box<dyn AIOpponent> {
    match difficulty {
        Difficulty::Easy => Box::new(easy::EasyAI::new()),
        Difficulty::Medium => Box::new(heuristic::HeuristicAI::medium()),
        Difficulty::Hard => Box::new(heuristic::HeuristicAI::hard()),
    }
}

/// One-shot move selection for a tier. Pure with respect to `game`.
///
/// Always a member of `legal` when `legal` is non-empty: if the tier cannot
/// decide, the first legal move is played. `None` means `legal` was empty,
/// which the turn controller never hands to an AI.
///
/// # Example
///
/// ```rust
/// use ludo_ai::select_ai_move;
/// use ludo_engine::dice::DieValue;
/// use ludo_engine::engine::initialize_game;
/// use ludo_engine::player::{Difficulty, PlayerSpec};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).unwrap();
/// let legal = engine.legal_moves(0, DieValue::SIX).unwrap();
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let mv = select_ai_move(engine.state(), 0, &legal, Difficulty::Hard, &mut rng);
/// assert!(mv.is_some_and(|m| legal.contains(&m)));
/// assert_eq!(select_ai_move(engine.state(), 0, &[], Difficulty::Easy, &mut rng), None);
/// ```
pub fn select_ai_move(
    game: &GameState,
    player: PlayerId,
    legal: &[Move],
    difficulty: Difficulty,
    rng: &mut dyn RngCore,
) -> Option<Move> {
    create_ai(difficulty)
        .select_move(game, player, legal, rng)
        .filter(|mv| legal.contains(mv))
        .or_else(|| legal.first().copied())
}

pub(crate) fn pick_random(legal: &[Move], rng: &mut dyn RngCore) -> Option<Move> {
    if legal.is_empty() {
        return None;
    }
    legal.get(rng.random_range(0..legal.len())).copied()
}

pub(crate) fn clamp_factor(factor: f64) -> f64 {
    if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    }
}
