//! Injectable randomness
//!
//! Every stochastic call site takes `&mut R where R: Rng`. Matches use a
//! seeded PCG stream; tests may pin draws with [`ConstRng`].

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Seed record for a match RNG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Fresh seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            seed: Pcg32::from_os_rng().next_u64(),
        }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Generator that always yields the same word
///
/// `ConstRng(0)` makes every Bernoulli draw succeed for p > 0;
/// `ConstRng(u64::MAX)` makes every draw with p < 1 fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstRng(pub u64);

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0 as u8);
    }
}
