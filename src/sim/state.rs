//! Spinner and arena state
//!
//! Spinners are built once per match from telemetry and mutated every tick.
//! Elimination is one-way: an eliminated spinner never re-enters play.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::integrate::DriveStrategy;
use super::telemetry::{PhysicalConstants, Telemetry, derive_spinner};
use crate::error::SimError;

/// Why a spinner left the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Elimination {
    /// Crossed the arena rim
    RingOut,
    /// Spin decayed below the minimum
    SpinOut,
    /// Fractured on impact
    Burst,
}

/// Spinner lifecycle: Active until eliminated, then removed for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fate {
    Active,
    Removed(Elimination),
}

/// One combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spinner {
    pub id: u32,
    /// Opaque label, not used by physics
    pub ticker: String,
    /// Normalized telemetry the drive and damage models read from
    pub traits: Telemetry,
    pub constants: PhysicalConstants,
    /// Drive-direction policy, fixed at construction
    pub drive: DriveStrategy,
    /// Display hue in degrees
    pub hue: f32,

    pub pos: Vec2,
    pub vel: Vec2,
    /// Current spin magnitude (never increases)
    pub omega: f32,
    /// Structural integrity in [0, 1] (never increases)
    pub coherence: f32,
    /// Visual rotation only
    pub angle: f32,
    pub fate: Fate,
}

impl Spinner {
    /// Build a spinner, rejecting derived constants that would corrupt a match
    pub fn new(id: u32, ticker: impl Into<String>, telemetry: &Telemetry) -> Result<Self, SimError> {
        let ticker = ticker.into();
        let traits = telemetry.normalized();
        let constants = derive_spinner(&traits);
        validate(&ticker, &constants)?;

        Ok(Self {
            id,
            ticker,
            traits,
            constants,
            drive: DriveStrategy::for_regime(traits.regime_bias),
            hue: 0.0,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            omega: constants.omega0,
            coherence: 1.0,
            angle: 0.0,
            fate: Fate::Active,
        })
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.fate == Fate::Active
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.constants.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.constants.radius
    }

    /// Current spin as a fraction of launch spin
    pub fn spin_ratio(&self) -> f32 {
        (self.omega / self.constants.omega0).clamp(0.0, 1.0)
    }

    /// Move to Removed; returns false if already removed
    pub fn eliminate(&mut self, cause: Elimination) -> bool {
        if !self.alive() {
            return false;
        }
        self.fate = Fate::Removed(cause);
        log::debug!("{} eliminated: {:?}", self.ticker, cause);
        true
    }
}

fn validate(ticker: &str, c: &PhysicalConstants) -> Result<(), SimError> {
    let positive = [
        ("mass", c.mass),
        ("radius", c.radius),
        ("vmax", c.vmax),
        ("omega0", c.omega0),
    ];
    for (field, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(SimError::InvalidConstants {
                ticker: ticker.to_string(),
                field,
                value,
            });
        }
    }
    if !(0.0..=1.0).contains(&c.stability) {
        return Err(SimError::InvalidConstants {
            ticker: ticker.to_string(),
            field: "stability",
            value: c.stability,
        });
    }
    Ok(())
}

/// Bounded circular arena holding the match's spinners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
    /// Sorted by id for deterministic iteration
    pub spinners: Vec<Spinner>,
}

impl Arena {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            spinners: Vec::new(),
        }
    }

    pub fn alive_count(&self) -> usize {
        self.spinners.iter().filter(|s| s.alive()).count()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Spinner> {
        self.spinners.iter().filter(|s| s.alive())
    }

    /// Mutable references to two distinct spinners by index
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Spinner, &mut Spinner) {
        debug_assert!(i < j);
        let (left, right) = self.spinners.split_at_mut(j);
        (&mut left[i], &mut right[0])
    }
}
