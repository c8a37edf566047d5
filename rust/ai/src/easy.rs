//! Easy tier: a fixed priority list with a large dose of randomness.

use rand::{Rng, RngCore};

use crate::{pick_random, AIOpponent, DEFAULT_EASY_RANDOM_FACTOR};
use ludo_engine::game::GameState;
use ludo_engine::player::PlayerId;
use ludo_engine::rules::{self, Move};

/// Plays like a beginner: often moves a random piece, otherwise takes a piece
/// home when it can, then a capture, then anything.
///
/// # Example
///
/// ```rust
/// use ludo_ai::easy::EasyAI;
/// use ludo_ai::AIOpponent;
///
/// let ai = EasyAI::new().with_random_factor(0.0);
/// assert_eq!(ai.name(), "EasyAI");
/// assert_eq!(ai.random_factor(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EasyAI {
    random_factor: f64,
}

impl EasyAI {
    pub fn new() -> Self {
        Self {
            random_factor: DEFAULT_EASY_RANDOM_FACTOR,
        }
    }

    /// Probability of ignoring the priority list; clamped to `[0, 1]`.
    pub fn with_random_factor(mut self, factor: f64) -> Self {
        self.random_factor = crate::clamp_factor(factor);
        self
    }

    pub fn random_factor(&self) -> f64 {
        self.random_factor
    }
}

impl Default for EasyAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AIOpponent for EasyAI {
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

        let previews: Vec<_> = legal
            .iter()
            .filter_map(|mv| rules::preview(game, player, *mv).map(|p| (*mv, p)))
            .collect();
        if let Some((mv, _)) = previews.iter().find(|(_, p)| p.reaches_home()) {
            return Some(*mv);
        }
        if let Some((mv, _)) = previews.iter().find(|(_, p)| p.captures.is_some()) {
            return Some(*mv);
        }
        pick_random(legal, rng)
    }

    fn name(&self) -> &str {
        "EasyAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_engine::dice::DieValue;
    use ludo_engine::engine::initialize_game;
    use ludo_engine::player::PlayerSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn default_factor_is_easy_tier() {
        assert_eq!(EasyAI::default().random_factor(), 0.30);
    }

    #[test]
    fn random_factor_is_clamped() {
        assert_eq!(EasyAI::new().with_random_factor(3.0).random_factor(), 1.0);
        assert_eq!(EasyAI::new().with_random_factor(-1.0).random_factor(), 0.0);
    }

    #[test]
    fn empty_legal_set_yields_none() {
        let engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(EasyAI::new().select_move(engine.state(), 0, &[], &mut rng), None);
    }

    #[test]
    fn always_picks_from_legal_set() {
        let engine = initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).unwrap();
        let legal = engine.legal_moves(0, DieValue::SIX).unwrap();
        let ai = EasyAI::new().with_random_factor(1.0);
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for _ in 0..50 {
            let mv = ai.select_move(engine.state(), 0, &legal, &mut rng).unwrap();
            assert!(legal.contains(&mv));
        }
    }
}
