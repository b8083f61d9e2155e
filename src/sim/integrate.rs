//! Per-spinner motion integrator
//!
//! One call advances one spinner by `dt` seconds. Order matters and is fixed:
//! drive, drag, speed clamp, spin decay, position (semi-implicit Euler),
//! soft-wall bounce, then the ring-out and spin-out checks.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{ImpactSource, SimEvent};
use super::geometry::{outward_normal, reflect_with_restitution, wall_penetration};
use super::state::{Elimination, Spinner};
use super::telemetry::{Regime, Telemetry};
use crate::consts::{RING_OUT_SLACK, SPIN_OUT_OMEGA, WALL_IMPACT};

/// Drive-direction policy, chosen once from the regime bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveStrategy {
    /// Tangential with an 18% inward bias
    InwardOrbit,
    /// 65% tangential, 28% outward, plus isotropic noise
    Erratic,
    /// Pure tangential
    Orbit,
}

impl DriveStrategy {
    pub fn for_regime(regime: Regime) -> Self {
        match regime {
            Regime::Range => DriveStrategy::InwardOrbit,
            Regime::Chaotic => DriveStrategy::Erratic,
            Regime::Other => DriveStrategy::Orbit,
        }
    }

    /// Unit drive direction given the inward and tangent directions
    pub fn direction<R: Rng + ?Sized>(&self, inward: Vec2, tangent: Vec2, rng: &mut R) -> Vec2 {
        match self {
            DriveStrategy::InwardOrbit => (tangent + inward * 0.18).normalize_or_zero(),
            DriveStrategy::Erratic => {
                let noise = Vec2::from_angle(rng.random_range(0.0..TAU));
                (tangent * 0.65 - inward * 0.28 + noise * 0.95).normalize_or_zero()
            }
            DriveStrategy::Orbit => tangent,
        }
    }
}

/// Drive acceleration magnitude
#[inline]
pub fn drive_accel(t: &Telemetry) -> f32 {
    140.0 + 380.0 * (0.7 * t.thrust_potential + 0.3 * t.signal_clarity)
}

/// Exponential linear drag rate
#[inline]
pub fn linear_drag(t: &Telemetry) -> f32 {
    0.35 + 0.8 * t.chop_sensitivity * t.chop_sensitivity
}

/// Exponential spin decay rate
#[inline]
pub fn spin_decay(t: &Telemetry) -> f32 {
    0.10 + 0.45 * (0.55 * t.chop_sensitivity + 0.45 * (1.0 - t.maneuver_stability))
}

/// Wall restitution for a spinner of the given stability
#[inline]
pub fn wall_restitution(stability: f32) -> f32 {
    0.25 + 0.45 * stability
}

/// Advance one spinner, pushing any wall-impact or elimination events
pub fn integrate<R: Rng + ?Sized>(
    spinner: &mut Spinner,
    center: Vec2,
    arena_radius: f32,
    dt: f32,
    rng: &mut R,
    events: &mut Vec<SimEvent>,
) {
    if !spinner.alive() {
        return;
    }
    if !spinner.pos.is_finite() {
        // Lost track of it: count as out of the ring so the match can still end
        log::warn!("Removing {}: non-finite position", spinner.ticker);
        spinner.pos = center;
        spinner.vel = Vec2::ZERO;
        if spinner.eliminate(Elimination::RingOut) {
            events.push(SimEvent::RingOut {
                id: spinner.id,
                pos: center,
            });
        }
        return;
    }
    if !spinner.vel.is_finite() {
        log::warn!("Resetting {}: non-finite velocity", spinner.ticker);
        spinner.vel = Vec2::ZERO;
    }

    let t = spinner.traits;

    let outward = outward_normal(spinner.pos, center);
    let inward = -outward;
    let tangent = outward.perp();

    let dir = spinner.drive.direction(inward, tangent, rng);
    spinner.vel += dir * drive_accel(&t) * dt;

    spinner.vel *= (-linear_drag(&t) * dt).exp();
    spinner.vel = spinner.vel.clamp_length_max(spinner.constants.vmax);

    spinner.omega = (spinner.omega * (-spin_decay(&t) * dt).exp()).max(0.0);

    spinner.pos += spinner.vel * dt;
    spinner.angle = (spinner.angle + spinner.omega * dt).rem_euclid(TAU);

    if let Some(contact) = wall_bounce(spinner, center, arena_radius) {
        events.push(SimEvent::Impact {
            pos: contact,
            impact01: WALL_IMPACT,
            source: ImpactSource::Wall,
        });
    }

    check_elimination(spinner, center, arena_radius, events);
}

/// Reflect off the soft wall if penetrating and still moving outward
///
/// Returns the contact point on the rim when a bounce happened.
pub fn wall_bounce(spinner: &mut Spinner, center: Vec2, arena_radius: f32) -> Option<Vec2> {
    if wall_penetration(spinner.pos, center, arena_radius, spinner.radius()) <= 0.0 {
        return None;
    }
    let normal = outward_normal(spinner.pos, center);
    if spinner.vel.dot(normal) <= 0.0 {
        return None;
    }
    let eb = wall_restitution(spinner.constants.stability);
    spinner.vel = reflect_with_restitution(spinner.vel, normal, eb);
    Some(center + normal * arena_radius)
}

/// Ring-out first, then spin-out
pub fn check_elimination(
    spinner: &mut Spinner,
    center: Vec2,
    arena_radius: f32,
    events: &mut Vec<SimEvent>,
) {
    let pos = spinner.pos;
    let limit = arena_radius + spinner.radius() * RING_OUT_SLACK;
    if pos.distance(center) > limit {
        if spinner.eliminate(Elimination::RingOut) {
            events.push(SimEvent::RingOut { id: spinner.id, pos });
        }
    } else if spinner.omega < SPIN_OUT_OMEGA && spinner.eliminate(Elimination::SpinOut) {
        events.push(SimEvent::SpinOut { id: spinner.id, pos });
    }
}
