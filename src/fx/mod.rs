//! Ephemeral visual effects
//!
//! Spawned from simulation events, aged once per tick, and never allowed to
//! grow without bound: every list has a hard cap and every primitive expires.

pub mod pool;
pub mod primitives;

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::settings::Settings;
use pool::Pool;
pub use primitives::{Callout, Particle, Ring, Shake, Trail, TrailPoint};

/// Maximum concurrent rings
pub const MAX_RINGS: usize = 64;
/// Maximum concurrent callouts
pub const MAX_CALLOUTS: usize = 24;

/// Impact onomatopoeia
const IMPACT_WORDS: [&str; 4] = ["CLANG!", "KRAK!", "BAM!", "WHAM!"];
/// Minimum intensity for an impact to get a callout
const CALLOUT_THRESHOLD: f32 = 0.45;
/// Spark hue range for impacts
const SPARK_HUE: (f32, f32) = (30.0, 55.0);

/// Owns every live effect primitive for one match
#[derive(Debug, Clone)]
pub struct EffectsSystem {
    particles: Pool<Particle>,
    rings: Pool<Ring>,
    callouts: Pool<Callout>,
    trails: Vec<Trail>,
    shake: Shake,
    trails_enabled: bool,
    shake_enabled: bool,
}

impl Default for EffectsSystem {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl EffectsSystem {
    pub fn new(settings: &Settings) -> Self {
        Self {
            particles: Pool::with_cap(settings.max_particles()),
            rings: Pool::with_cap(MAX_RINGS),
            callouts: Pool::with_cap(if settings.callouts { MAX_CALLOUTS } else { 0 }),
            trails: Vec::new(),
            shake: Shake::default(),
            trails_enabled: settings.trails,
            shake_enabled: settings.effective_screen_shake(),
        }
    }

    /// Drop every primitive
    pub fn clear(&mut self) {
        self.particles.clear();
        self.rings.clear();
        self.callouts.clear();
        self.trails.clear();
        self.shake = Shake::default();
    }

    /// Collision or wall impact of normalized intensity `impact01`
    pub fn impact<R: Rng + ?Sized>(&mut self, pos: Vec2, impact01: f32, rng: &mut R) {
        let i = impact01.clamp(0.0, 1.0);

        self.rings.push(Ring::new(pos, 6.0, 160.0 + 260.0 * i, 0.35));

        let count = 10 + (34.0 * i).round() as usize;
        for _ in 0..count {
            let dir = Vec2::from_angle(rng.random_range(0.0..TAU));
            let speed = rng.random_range(80.0..=160.0 + 340.0 * i);
            let pushed = self.particles.push(Particle {
                pos,
                vel: dir * speed,
                drag: 3.5,
                life: rng.random_range(0.25..0.55),
                size: rng.random_range(1.5..=2.5 + 2.5 * i),
                hue: rng.random_range(SPARK_HUE.0..SPARK_HUE.1),
            });
            if !pushed {
                break;
            }
        }

        if i >= CALLOUT_THRESHOLD {
            let word = IMPACT_WORDS[rng.random_range(0..IMPACT_WORDS.len())];
            self.pop_text(pos + Vec2::new(0.0, -18.0), word, 0.6, 0.8 + 0.6 * i, true);
        }

        self.starburst(pos, i, rng);
        self.add_shake(4.0 + 10.0 * i, 0.12);
    }

    /// Short evenly spaced rays around an impact point
    fn starburst<R: Rng + ?Sized>(&mut self, pos: Vec2, intensity: f32, rng: &mut R) {
        const RAYS: usize = 8;
        let offset = rng.random_range(0.0..TAU);
        for k in 0..RAYS {
            let angle = offset + TAU * k as f32 / RAYS as f32;
            let pushed = self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * (260.0 + 240.0 * intensity),
                drag: 6.0,
                life: 0.18,
                size: 3.0,
                hue: 50.0,
            });
            if !pushed {
                break;
            }
        }
    }

    /// Structural fracture of a spinner
    pub fn burst<R: Rng + ?Sized>(&mut self, pos: Vec2, hue: f32, rng: &mut R) {
        self.rings.push(Ring::new(pos, 10.0, 320.0, 0.6));
        self.rings.push(Ring::new(pos, 4.0, 180.0, 0.9));
        for _ in 0..60 {
            let dir = Vec2::from_angle(rng.random_range(0.0..TAU));
            let pushed = self.particles.push(Particle {
                pos,
                vel: dir * rng.random_range(120.0..420.0),
                drag: 2.2,
                life: rng.random_range(0.5..1.0),
                size: rng.random_range(2.0..5.0),
                hue: (hue + rng.random_range(-15.0..15.0)).rem_euclid(360.0),
            });
            if !pushed {
                break;
            }
        }
        self.pop_text(pos + Vec2::new(0.0, -24.0), "BURST!", 1.0, 1.6, true);
        self.add_shake(14.0, 0.25);
    }

    /// Spinner crossed the rim
    pub fn ring_out(&mut self, pos: Vec2) {
        self.rings.push(Ring::new(pos, 8.0, 220.0, 0.5));
        self.pop_text(pos + Vec2::new(0.0, -24.0), "RING OUT!", 0.9, 1.4, true);
        self.add_shake(9.0, 0.18);
    }

    /// Spinner ran out of spin
    pub fn spin_out(&mut self, pos: Vec2) {
        self.rings.push(Ring::new(pos, 4.0, 90.0, 0.4));
        self.pop_text(pos + Vec2::new(0.0, -24.0), "SPIN OUT", 0.9, 1.2, false);
    }

    /// Floating text that drifts upward
    pub fn pop_text(&mut self, pos: Vec2, text: &str, life: f32, scale: f32, jitter: bool) {
        self.callouts.push(Callout {
            pos,
            text: text.to_string(),
            life,
            float_speed: 40.0,
            scale,
            jitter,
        });
    }

    /// Large stationary text
    pub fn banner(&mut self, pos: Vec2, text: &str) {
        self.callouts.push(Callout {
            pos,
            text: text.to_string(),
            life: 1.6,
            float_speed: 0.0,
            scale: 2.2,
            jitter: false,
        });
    }

    /// Record a trail sample for a spinner
    pub fn push_trail(&mut self, spinner_id: u32, pos: Vec2, hue: f32) {
        if !self.trails_enabled {
            return;
        }
        let idx = match self.trails.iter().position(|t| t.spinner_id == spinner_id) {
            Some(idx) => idx,
            None => {
                self.trails.push(Trail::new(spinner_id, hue));
                self.trails.len() - 1
            }
        };
        self.trails[idx].push(pos);
    }

    pub fn add_shake(&mut self, amount: f32, hold: f32) {
        if self.shake_enabled {
            self.shake.add(amount, hold);
        }
    }

    /// Age everything by `dt` and drop what expired
    pub fn update(&mut self, dt: f32) {
        self.particles.update(dt);
        self.rings.update(dt);
        self.callouts.update(dt);
        for trail in self.trails.iter_mut() {
            trail.age(dt);
        }
        self.trails.retain(|t| !t.points.is_empty());
        self.shake.update(dt);
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    pub fn rings(&self) -> &[Ring] {
        self.rings.as_slice()
    }

    pub fn callouts(&self) -> &[Callout] {
        self.callouts.as_slice()
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn trail(&self, spinner_id: u32) -> Option<&Trail> {
        self.trails.iter().find(|t| t.spinner_id == spinner_id)
    }

    pub fn shake(&self) -> Shake {
        self.shake
    }

    /// Random camera offset for the current shake
    pub fn shake_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if self.shake.amplitude <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::from_angle(rng.random_range(0.0..TAU)) * rng.random_range(0.0..=self.shake.amplitude)
    }

    /// True when nothing is left to draw
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty()
            && self.rings.is_empty()
            && self.callouts.is_empty()
            && self.trails.is_empty()
            && self.shake.amplitude == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRAIL_CAP;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_impact_particle_count_scales() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut soft = EffectsSystem::default();
        soft.impact(Vec2::ZERO, 0.0, &mut rng);
        // 10 sparks + 8 flare rays
        assert_eq!(soft.particles().len(), 18);
        assert!(soft.callouts().is_empty());

        let mut hard = EffectsSystem::default();
        hard.impact(Vec2::ZERO, 1.0, &mut rng);
        assert_eq!(hard.particles().len(), 44 + 8);
        assert_eq!(hard.callouts().len(), 1);
        assert_eq!(hard.rings().len(), 1);
        assert!(hard.shake().amplitude > 0.0);
    }

    #[test]
    fn test_everything_expires() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fx = EffectsSystem::default();
        fx.impact(Vec2::ZERO, 1.0, &mut rng);
        fx.burst(Vec2::new(10.0, 0.0), 200.0, &mut rng);
        fx.ring_out(Vec2::new(0.0, 10.0));
        fx.spin_out(Vec2::new(5.0, 5.0));
        fx.banner(Vec2::ZERO, "FIGHT!");
        fx.push_trail(1, Vec2::ZERO, 0.0);
        assert!(!fx.is_idle());

        for _ in 0..300 {
            fx.update(1.0 / 60.0);
        }
        assert!(fx.is_idle());
    }

    #[test]
    fn test_particle_cap_respected() {
        let settings = Settings::from_preset(crate::QualityPreset::Low);
        let mut fx = EffectsSystem::new(&settings);
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..10 {
            fx.burst(Vec2::ZERO, 0.0, &mut rng);
        }
        assert_eq!(fx.particles().len(), settings.max_particles());
    }

    #[test]
    fn test_trails_capped_per_spinner() {
        let mut fx = EffectsSystem::default();
        for i in 0..50 {
            fx.push_trail(1, Vec2::new(i as f32, 0.0), 10.0);
            fx.push_trail(2, Vec2::new(0.0, i as f32), 90.0);
        }
        assert_eq!(fx.trails().len(), 2);
        assert_eq!(fx.trail(1).map(|t| t.points.len()), Some(TRAIL_CAP));
        assert_eq!(fx.trail(2).map(|t| t.points.len()), Some(TRAIL_CAP));
    }

    #[test]
    fn test_disabled_toggles_suppress_spawns() {
        let settings = Settings {
            particles: false,
            trails: false,
            callouts: false,
            reduced_motion: true,
            ..Settings::default()
        };
        let mut fx = EffectsSystem::new(&settings);
        let mut rng = Pcg32::seed_from_u64(4);
        fx.impact(Vec2::ZERO, 1.0, &mut rng);
        fx.push_trail(1, Vec2::ZERO, 0.0);
        assert!(fx.particles().is_empty());
        assert!(fx.callouts().is_empty());
        assert!(fx.trails().is_empty());
        assert_eq!(fx.shake().amplitude, 0.0);
        assert_eq!(fx.rings().len(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut fx = EffectsSystem::default();
        fx.burst(Vec2::ZERO, 0.0, &mut rng);
        fx.push_trail(3, Vec2::ZERO, 0.0);
        fx.clear();
        assert!(fx.is_idle());
    }
}
