//! Signed distances and contact normals for circles in a circular arena

use glam::Vec2;

/// Signed distance from a point to a circle's edge (negative inside)
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// How far a disc of `radius` has pushed past the soft wall
///
/// The soft wall sits at `arena_radius - radius`; positive means penetrating.
#[inline]
pub fn wall_penetration(p: Vec2, center: Vec2, arena_radius: f32, radius: f32) -> f32 {
    sd_circle(p, center, arena_radius - radius)
}

/// Unit vector from the arena center toward `p` (zero at the center)
#[inline]
pub fn outward_normal(p: Vec2, center: Vec2) -> Vec2 {
    (p - center).normalize_or_zero()
}

/// Contact between two discs
#[derive(Debug, Clone, Copy)]
pub struct DiscContact {
    /// Unit normal from A toward B
    pub normal: Vec2,
    pub distance: f32,
    pub penetration: f32,
}

/// Overlap test for two discs; `None` when apart, touching, or coincident
pub fn disc_contact(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Option<DiscContact> {
    let delta = pb - pa;
    let distance = delta.length();
    let radius_sum = ra + rb;
    if !distance.is_finite() || distance >= radius_sum || distance <= f32::EPSILON {
        return None;
    }
    Some(DiscContact {
        normal: delta / distance,
        distance,
        penetration: radius_sum - distance,
    })
}

/// Reflect velocity off a surface with the given restitution
///
/// Only the normal component is scaled; `vn` is `vel·normal`.
#[inline]
pub fn reflect_with_restitution(vel: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = vel.dot(normal);
    vel - (1.0 + restitution) * vn * normal
}
