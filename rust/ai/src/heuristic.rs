//! Medium and Hard tiers: pick the best-scoring legal move.

use rand::{Rng, RngCore};

use crate::evaluate::Evaluator;
use crate::{pick_random, AIOpponent, DEFAULT_HARD_RANDOM_FACTOR, DEFAULT_MEDIUM_RANDOM_FACTOR};
use ludo_engine::game::GameState;
use ludo_engine::player::PlayerId;
use ludo_engine::rules::Move;

/// Scores every legal move with [`Evaluator`] and plays the maximum. Ties go
/// to the move generated first. A small random factor keeps play from being
/// fully predictable.
///
/// The Hard tier differs only in enabling the evaluator's tactical terms and a
/// smaller random factor.
///
/// # Example
///
/// ```rust
/// use ludo_ai::heuristic::HeuristicAI;
/// use ludo_ai::AIOpponent;
///
/// assert_eq!(HeuristicAI::medium().name(), "MediumAI");
/// assert_eq!(HeuristicAI::hard().name(), "HardAI");
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicAI {
    name: &'static str,
    tactical: bool,
    random_factor: f64,
}

impl HeuristicAI {
    pub fn medium() -> Self {
        Self {
            name: "MediumAI",
            tactical: false,
            random_factor: DEFAULT_MEDIUM_RANDOM_FACTOR,
        }
    }

    pub fn hard() -> Self {
        Self {
            name: "HardAI",
            tactical: true,
            random_factor: DEFAULT_HARD_RANDOM_FACTOR,
        }
    }

    /// Probability of playing a random legal move; clamped to `[0, 1]`.
    pub fn with_random_factor(mut self, factor: f64) -> Self {
        self.random_factor = crate::clamp_factor(factor);
        self
    }

    pub fn random_factor(&self) -> f64 {
        self.random_factor
    }

    /// Best-scoring move without the random escape hatch. Falls back to the
    /// first legal move when no candidate can be scored.
    pub fn best_move(&self, game: &GameState, player: PlayerId, legal: &[Move]) -> Option<Move> {
        let eval = Evaluator::new(game, player, self.tactical);
        let mut best: Option<(Move, i32)> = None;
        for &mv in legal {
            let Some(score) = eval.score(mv) else {
                continue;
            };
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((mv, score));
            }
        }
        match best {
            Some((mv, score)) => {
                tracing::trace!(ai = self.name, player, piece = mv.piece, score, "move scored best");
                Some(mv)
            }
            None => legal.first().copied(),
        }
    }
}

impl AIOpponent for HeuristicAI {
    fn select_move(
        &self,
        game: &GameState,
        player: PlayerId,
        legal: &[Move],
        rng: &mut dyn RngCore,
    ) -> Option<Move> {
        if legal.is_empty() {
            return None;
        }
        if rng.random_bool(self.random_factor) {
            return pick_random(legal, rng);
        }
        self.best_move(game, player, legal)
    }

    fn name(&self) -> &str {
        self.name
    }
}
