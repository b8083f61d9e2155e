//! Discrete simulation events
//!
//! Physics code only produces these; effects, audio and banners consume them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What produced an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactSource {
    /// Two spinners collided
    Clash,
    /// A spinner bounced off the soft wall
    Wall,
}

/// Result of one resolved spinner-spinner collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: u32,
    pub b: u32,
    /// Midpoint between the two centers after correction
    pub point: Vec2,
    /// Normalized impulse magnitude in [0, 1]
    pub impact01: f32,
    pub burst_a: bool,
    pub burst_b: bool,
}

/// Event emitted by a tick, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Impact {
        pos: Vec2,
        impact01: f32,
        source: ImpactSource,
    },
    Burst {
        id: u32,
        pos: Vec2,
        hue: f32,
    },
    RingOut {
        id: u32,
        pos: Vec2,
    },
    SpinOut {
        id: u32,
        pos: Vec2,
    },
    /// Winner ticker, or None when the last spinners died together
    MatchEnd {
        winner: Option<String>,
    },
}
