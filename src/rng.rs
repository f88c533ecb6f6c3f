//! uniform(0,1) draws for the cohort generators
//!
//! a seed gives the classroom LCG (small period, fine for demos, useless for
//! serious monte carlo). no seed means OS entropy via `StdRng`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// source of uniform draws in [0, 1)
#[derive(Debug, Clone)]
pub enum RandomSource {
    /// reproducible linear congruential stream
    Seeded { state: u64 },
    /// non-reproducible system randomness
    System(StdRng),
}

impl RandomSource {
    /// seeded LCG when a seed is given, entropy-backed otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        // only state mod 233280 ever matters for the next draw
        Self::Seeded { state: seed % MODULUS }
    }

    pub fn from_entropy() -> Self {
        Self::System(StdRng::from_entropy())
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded { .. })
    }

    /// next uniform draw in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        match self {
            Self::Seeded { state } => {
                *state = (*state * MULTIPLIER + INCREMENT) % MODULUS;
                *state as f64 / MODULUS as f64
            }
            Self::System(rng) => rng.r#gen::<f64>(),
        }
    }

    /// uniform draw scaled into [min, max)
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// exponential(rate) draw by inversion: -ln(u) / rate
    pub fn exponential(&mut self, rate: f64) -> f64 {
        -self.next_f64().ln() / rate
    }
}
