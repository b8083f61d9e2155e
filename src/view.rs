//! Read-only snapshots for drawing collaborators

use glam::Vec2;
use serde::Serialize;

use crate::fx::{Callout, EffectsSystem, Particle, Ring, Trail};
use crate::sim::state::Spinner;

/// What a renderer needs to draw one live spinner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinnerView {
    pub id: u32,
    pub ticker: String,
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub coherence: f32,
    /// omega / omega0
    pub spin_ratio: f32,
    pub hue: f32,
}

impl From<&Spinner> for SpinnerView {
    fn from(s: &Spinner) -> Self {
        Self {
            id: s.id,
            ticker: s.ticker.clone(),
            pos: s.pos,
            angle: s.angle,
            radius: s.radius(),
            coherence: s.coherence,
            spin_ratio: s.spin_ratio(),
            hue: s.hue,
        }
    }
}

/// Borrowed view of every live effect primitive
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EffectsView<'a> {
    pub particles: &'a [Particle],
    pub rings: &'a [Ring],
    pub callouts: &'a [Callout],
    pub trails: &'a [Trail],
    pub shake: f32,
}

impl<'a> From<&'a EffectsSystem> for EffectsView<'a> {
    fn from(fx: &'a EffectsSystem) -> Self {
        Self {
            particles: fx.particles(),
            rings: fx.rings(),
            callouts: fx.callouts(),
            trails: fx.trails(),
            shake: fx.shake().amplitude,
        }
    }
}

/// Everything a frame needs
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub center: Vec2,
    pub arena_radius: f32,
    pub spinners: Vec<SpinnerView>,
    pub effects: EffectsView<'a>,
}
