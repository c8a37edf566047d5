//! Random number generator inspection command.
//!
//! Rolls the die with the same `ChaCha20Rng` the games use and prints the
//! first rolls plus the face distribution, to check that a seed reproduces
//! and that the faces come out roughly uniform.

use crate::error::CliError;
use ludo_engine::dice::{DIE_FACES, DieValue};
use rand::SeedableRng;
use std::io::Write;

pub const DEFAULT_ROLLS: u32 = 600;
const SAMPLE_LEN: usize = 10;

/// Handle the rng command.
///
/// # Arguments
///
/// * `seed` - Optional seed value for the RNG (uses random seed if None)
/// * `rolls` - How many rolls to draw for the distribution
/// * `out` - Output stream for the sample and distribution
pub fn handle_rng_command(
    seed: Option<u64>,
    rolls: u32,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if rolls == 0 {
        return Err(CliError::InvalidInput("rolls must be >= 1".to_string()));
    }
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(s);

    let mut sample = Vec::with_capacity(SAMPLE_LEN);
    let mut counts = [0u32; DIE_FACES as usize];
    for _ in 0..rolls {
        let die = DieValue::roll(&mut rng);
        if sample.len() < SAMPLE_LEN {
            sample.push(die.get());
        }
        counts[usize::from(die.get() - 1)] += 1;
    }

    writeln!(out, "seed: {}", s)?;
    writeln!(out, "RNG sample: {:?}", sample)?;
    let distribution = counts
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}={}", i + 1, c))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "Distribution ({} rolls): {}", rolls, distribution)?;
    Ok(())
}
