//! Arena configuration and presentation preferences
//!
//! Loaded from a JSON file; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_RADIUS, MAX_DT};
use crate::error::SimError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 120,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1200,
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena radius in world units
    pub arena_radius: f32,
    /// Largest step a tick may integrate (seconds)
    pub max_dt: f32,
    /// Fixed RNG seed (None = OS entropy)
    pub seed: Option<u64>,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    pub particles: bool,
    pub screen_shake: bool,
    pub trails: bool,
    /// Onomatopoeia and banner text
    pub callouts: bool,

    // === Accessibility ===
    /// Reduced motion (no screen shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_radius: ARENA_RADIUS,
            max_dt: MAX_DT,
            seed: None,
            quality: QualityPreset::Medium,

            particles: true,
            screen_shake: true,
            trails: true,
            callouts: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Settings with a fixed seed, for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Reject values that would break the arena geometry or run time backwards
    pub fn validate(&self) -> Result<(), SimError> {
        for (field, value) in [("arena_radius", self.arena_radius), ("max_dt", self.max_dt)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidSettings { field, value });
            }
        }
        Ok(())
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} (arena radius {}, quality {})",
            path.display(),
            settings.arena_radius,
            settings.quality.as_str()
        );
        Ok(settings)
    }
}
