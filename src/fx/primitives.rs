//! Visual primitives owned by the effects system
//!
//! None of these affect physics. Each counts down its own `life`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::Ephemeral;
use crate::consts::TRAIL_CAP;

/// Seconds a trail sample stays visible
pub const TRAIL_POINT_LIFE: f32 = 0.35;
/// Screen shake amplitude ceiling
pub const SHAKE_CAP: f32 = 18.0;
/// Exponential shake decay rate once the hold timer runs out
pub const SHAKE_DECAY: f32 = 8.0;

/// A spark or debris fleck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Exponential drag rate
    pub drag: f32,
    pub life: f32,
    pub size: f32,
    /// Hue in degrees
    pub hue: f32,
}

impl Ephemeral for Particle {
    fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= (-self.drag * dt).exp();
        self.life -= dt;
    }

    fn life(&self) -> f32 {
        self.life
    }
}

/// An expanding shockwave ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub center: Vec2,
    pub radius: f32,
    /// Radius growth per second
    pub growth: f32,
    pub life: f32,
    /// Initial life, for fading
    pub ttl: f32,
    pub alpha: f32,
}

impl Ring {
    pub fn new(center: Vec2, radius: f32, growth: f32, life: f32) -> Self {
        Self {
            center,
            radius,
            growth,
            life,
            ttl: life,
            alpha: 1.0,
        }
    }
}

impl Ephemeral for Ring {
    fn step(&mut self, dt: f32) {
        self.radius += self.growth * dt;
        self.life -= dt;
        self.alpha = (self.life / self.ttl).clamp(0.0, 1.0);
    }

    fn life(&self) -> f32 {
        self.life
    }
}

/// Floating text: onomatopoeia, elimination callouts and banners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callout {
    pub pos: Vec2,
    pub text: String,
    pub life: f32,
    /// Upward drift per second (toward -y)
    pub float_speed: f32,
    pub scale: f32,
    /// Renderer should shake the glyphs
    pub jitter: bool,
}

impl Ephemeral for Callout {
    fn step(&mut self, dt: f32) {
        self.pos.y -= self.float_speed * dt;
        self.life -= dt;
    }

    fn life(&self) -> f32 {
        self.life
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life: f32,
}

/// Recent positions of one spinner, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    pub spinner_id: u32,
    pub hue: f32,
    pub points: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn new(spinner_id: u32, hue: f32) -> Self {
        Self {
            spinner_id,
            hue,
            points: VecDeque::with_capacity(TRAIL_CAP),
        }
    }

    pub fn push(&mut self, pos: Vec2) {
        self.points.push_front(TrailPoint {
            pos,
            life: TRAIL_POINT_LIFE,
        });
        self.points.truncate(TRAIL_CAP);
    }

    /// Age every point; the oldest sit at the back and expire first
    pub fn age(&mut self, dt: f32) {
        for point in self.points.iter_mut() {
            point.life -= dt;
        }
        while self.points.back().is_some_and(|p| p.life <= 0.0) {
            self.points.pop_back();
        }
    }
}

/// Screen shake: hold for `life`, then decay exponentially
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Shake {
    pub amplitude: f32,
    pub life: f32,
}

impl Shake {
    pub fn add(&mut self, amount: f32, hold: f32) {
        self.amplitude = (self.amplitude + amount).min(SHAKE_CAP);
        self.life = self.life.max(hold);
    }

    pub fn update(&mut self, dt: f32) {
        if self.life > 0.0 {
            self.life = (self.life - dt).max(0.0);
        } else if self.amplitude > 0.0 {
            self.amplitude *= (-SHAKE_DECAY * dt).exp();
            if self.amplitude < 0.05 {
                self.amplitude = 0.0;
            }
        }
    }
}
