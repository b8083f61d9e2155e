//! Spin Arena - telemetry-driven spinner battles in a circular arena
//!
//! Core modules:
//! - `sim`: Simulation core (telemetry adapter, integrator, collisions, match loop)
//! - `fx`: Ephemeral visual effects driven by simulation events
//! - `view`: Read-only snapshots for drawing collaborators
//! - `cues`: Event to audio/banner cue mapping for collaborators
//! - `settings`: Arena and presentation configuration

pub mod cues;
pub mod error;
pub mod fx;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::SimError;
pub use settings::{QualityPreset, Settings};

/// Simulation constants
pub mod consts {
    /// Largest step a single tick may integrate (seconds)
    pub const MAX_DT: f32 = 0.033;
    /// Fixed step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Default arena radius
    pub const ARENA_RADIUS: f32 = 300.0;
    /// Spawn ring as a fraction of the arena radius
    pub const SPAWN_RING: f32 = 0.35;
    /// Initial inward and tangential launch speeds
    pub const LAUNCH_INWARD: f32 = 70.0;
    pub const LAUNCH_TANGENT: f32 = 40.0;

    /// Spin below this eliminates the spinner
    pub const SPIN_OUT_OMEGA: f32 = 2.0;
    /// Coherence at or below this may fracture on impact
    pub const BURST_COHERENCE: f32 = 0.08;
    /// Extra slack past the rim (fraction of radius) before a ring-out
    pub const RING_OUT_SLACK: f32 = 0.35;
    /// Normalized intensity reported for a wall bounce
    pub const WALL_IMPACT: f32 = 0.22;
    /// Impulse magnitude that maps to impact01 = 1
    pub const IMPULSE_FULL_SCALE: f32 = 2.2;

    /// Trail points kept per spinner
    pub const TRAIL_CAP: usize = 22;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Quadratic ease-out: 1 - (1 - x)^2
#[inline]
pub fn ease_out(x: f32) -> f32 {
    1.0 - (1.0 - x) * (1.0 - x)
}
