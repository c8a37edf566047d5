use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of faces on the die.
pub const DIE_FACES: u8 = 6;

/// A single die result, always within 1..=6.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    pub const SIX: DieValue = DieValue(6);

    pub fn new(value: u8) -> Option<Self> {
        (1..=DIE_FACES).contains(&value).then_some(Self(value))
    }

    /// Draws a uniformly distributed value from the injected RNG.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(1..=DIE_FACES))
    }

    /// All six faces in ascending order.
    pub fn faces() -> impl Iterator<Item = DieValue> {
        (1..=DIE_FACES).map(DieValue)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_six(self) -> bool {
        self.0 == DIE_FACES
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieValue::new(value).ok_or_else(|| format!("die value out of range: {}", value))
    }
}

impl From<DieValue> for u8 {
    fn from(die: DieValue) -> Self {
        die.0
    }
}

impl fmt::Display for DieValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
