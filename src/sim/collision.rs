//! Pairwise spinner collision resolution
//!
//! Impulse-based response between two discs with material properties taken
//! from telemetry: positional correction, normal impulse with restitution,
//! clamped friction, then spin and coherence damage and the fracture roll.
//!
//! The resolver only flags a fracture; the caller applies the elimination.

use glam::Vec2;
use rand::Rng;

use super::events::CollisionEvent;
use super::geometry::disc_contact;
use super::state::Spinner;
use crate::clamp01;
use crate::consts::{BURST_COHERENCE, IMPULSE_FULL_SCALE};

/// Restitution for a pair
pub fn restitution(a: &Spinner, b: &Spinner) -> f32 {
    let stability = 0.5 * (a.constants.stability + b.constants.stability);
    let signal = 0.5 * (a.traits.signal_clarity + b.traits.signal_clarity);
    0.15 + 0.50 * clamp01(0.6 * stability + 0.4 * signal)
}

/// Friction coefficient for a pair
pub fn friction(a: &Spinner, b: &Spinner) -> f32 {
    0.02 + 0.16 * (0.5 * (1.0 - a.constants.stability) + 0.5 * (1.0 - b.constants.stability))
}

/// Resolve one unordered pair
///
/// Returns `None` when either spinner is dead, the discs do not overlap, the
/// centers coincide, or the pair is already separating (after the positional
/// correction, which always runs on overlap).
pub fn resolve<R: Rng + ?Sized>(
    a: &mut Spinner,
    b: &mut Spinner,
    rng: &mut R,
) -> Option<CollisionEvent> {
    if !a.alive() || !b.alive() {
        return None;
    }
    let contact = disc_contact(a.pos, a.radius(), b.pos, b.radius())?;
    let n = contact.normal;

    let inv_a = 1.0 / a.mass();
    let inv_b = 1.0 / b.mass();
    let inv_sum = inv_a + inv_b;

    // Split penetration inversely to mass
    a.pos -= n * contact.penetration * (inv_a / inv_sum);
    b.pos += n * contact.penetration * (inv_b / inv_sum);

    let rv = b.vel - a.vel;
    let vn = rv.dot(n);
    if vn > 0.0 {
        return None;
    }

    let e = restitution(a, b);
    let j = -(1.0 + e) * vn / inv_sum;
    let impulse = n * j;
    a.vel -= impulse * inv_a;
    b.vel += impulse * inv_b;

    let rv = b.vel - a.vel;
    let tangent = (rv - n * rv.dot(n)).normalize_or_zero();
    if tangent != Vec2::ZERO {
        let max_jt = friction(a, b) * j.abs();
        let jt = (-rv.dot(tangent) / inv_sum).clamp(-max_jt, max_jt);
        a.vel -= tangent * jt * inv_a;
        b.vel += tangent * jt * inv_b;
    }

    let impact01 = clamp01(j.abs() / IMPULSE_FULL_SCALE);

    let crossed_a = apply_damage(a, impact01);
    let crossed_b = apply_damage(b, impact01);
    let burst_a = crossed_a && rng.random::<f32>() < fracture_chance(a, impact01);
    let burst_b = crossed_b && rng.random::<f32>() < fracture_chance(b, impact01);

    Some(CollisionEvent {
        a: a.id,
        b: b.id,
        point: (a.pos + b.pos) * 0.5,
        impact01,
        burst_a,
        burst_b,
    })
}

/// Spin and coherence loss for one side
///
/// Returns true if coherence crossed the fracture threshold on this hit.
pub fn apply_damage(s: &mut Spinner, impact01: f32) -> bool {
    let hull = s.traits.hull_resilience;
    let chop = s.traits.chop_sensitivity;
    let maneuver = s.traits.maneuver_stability;

    let spin_loss = impact01 * (0.8 + 2.2 * (1.0 - hull) + 1.6 * chop);
    s.omega = (s.omega - spin_loss).max(0.0);

    let base = impact01 * (0.010 + 0.020 * (1.0 - hull) + 0.014 * (1.0 - maneuver));
    // Slower spinners are more fragile
    let fragility = 1.0 + 0.9 * (1.0 - s.omega / s.constants.omega0);
    let before = s.coherence;
    s.coherence = clamp01(s.coherence - base * fragility);

    before > BURST_COHERENCE && s.coherence <= BURST_COHERENCE
}

/// Probability that a spinner which just crossed the threshold bursts
pub fn fracture_chance(s: &Spinner, impact01: f32) -> f32 {
    let hull = s.traits.hull_resilience;
    let chop = s.traits.chop_sensitivity;
    let p = impact01.powf(1.3)
        * (1.0 - s.coherence).powf(1.8)
        * (1.0 - hull).powf(1.2)
        * (0.6 + 0.8 * chop);
    clamp01(p)
}
