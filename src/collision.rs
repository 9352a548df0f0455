//! Impulse-based contact handling: particle-wall, body-wall and body-body.

use crate::float::Float;
use crate::particle::Particle;
use crate::rigid_body::RigidBody;
use crate::vec::Vec2;
use crate::wall::Wall;

/// A single resolved contact: where it happened and the unit separating direction.
///
/// For wall contacts the normal is the wall's inward normal. For body pairs
/// returned by [`detect_collision`] it points from the second body toward the
/// first, the direction in which the first body is pushed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact<F: Float> {
    pub point: Vec2<F>,
    pub normal: Vec2<F>,
}

/// Reflect a particle off a wall when its disc overlaps the wall and it is
/// still moving into it, then scale the velocity by `1 - damping`.
///
/// Only the velocity changes. Returns whether an impulse was applied.
pub fn reflect_particle<F: Float>(particle: &mut Particle<F>, wall: &Wall<F>, radius: F, damping: F) -> bool {
    if particle.locked {
        return false;
    }
    let n = wall.normal;
    let vn = particle.velocity.dot(n);
    if wall.signed_distance(particle.position) >= radius || vn >= F::zero() {
        return false;
    }
    particle.velocity = (particle.velocity - n * (F::two() * vn)) * (F::one() - damping);
    true
}

/// The average of all body points on the outer side of `wall`, if any.
///
/// Averaging keeps a flat edge resting on a wall from receiving one impulse
/// per vertex.
pub fn wall_contact<F: Float>(body: &RigidBody<F>, wall: &Wall<F>) -> Option<Contact<F>> {
    let (sum, count) = body
        .points()
        .iter()
        .filter(|p| wall.is_outside(**p))
        .fold((Vec2::zero(), 0usize), |(sum, count), &p| (sum + p, count + 1));
    if count == 0 {
        return None;
    }
    Some(Contact { point: sum / F::from_usize(count), normal: wall.normal })
}

/// Apply a restitution impulse against a static surface.
///
/// Returns `false` without touching the body when the contact point is
/// already separating.
pub fn resolve_static_contact<F: Float>(
    body: &mut RigidBody<F>,
    contact: &Contact<F>,
    elasticity: F,
    damping_scale: F,
) -> bool {
    let n = contact.normal;
    let r = contact.point - body.position;
    let vn = body.velocity_at(contact.point).dot(n);
    if vn >= F::zero() {
        return false;
    }
    let rn = r.cross(n);
    let denom = body.inv_mass() + rn * rn * body.inv_inertia();
    let j = -(F::one() + elasticity) * vn / denom;

    body.linear_velocity += n * (j * body.inv_mass());
    body.angular_velocity = body.angular_velocity + j * rn * body.inv_inertia();
    body.scale_velocity(damping_scale);
    true
}

/// Narrow-phase overlap test for two convex bodies.
///
/// Every vertex and edge midpoint of each body is tested against the other.
/// A sample of `b1` inside `b2` contributes `b2`'s nearest outward edge
/// normal; a sample of `b2` inside `b1` contributes the negation of `b1`'s.
/// The contact is the mean of all inside samples, the normal the normalized
/// sum of contributions.
pub fn detect_collision<F: Float>(b1: &RigidBody<F>, b2: &RigidBody<F>) -> Option<Contact<F>> {
    let mut point_sum = Vec2::zero();
    let mut normal_sum = Vec2::zero();
    let mut count = 0usize;

    for p in b1.samples() {
        if let Some(n) = b2.contains(p) {
            point_sum += p;
            normal_sum += n;
            count += 1;
        }
    }
    for p in b2.samples() {
        if let Some(n) = b1.contains(p) {
            point_sum += p;
            normal_sum -= n;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let mut normal = normal_sum.normalize();
    if normal == Vec2::zero() {
        // Contributions cancelled out; separate along the centroid axis.
        normal = (b1.position - b2.position).normalize();
    }
    Some(Contact { point: point_sum / F::from_usize(count), normal })
}

/// Exchange a restitution impulse between two bodies at `contact`.
///
/// `contact.normal` must point from `b2` toward `b1`. Returns `false` when
/// the bodies are already separating at the contact point.
pub fn resolve_collision<F: Float>(
    b1: &mut RigidBody<F>,
    b2: &mut RigidBody<F>,
    contact: &Contact<F>,
    elasticity: F,
    damping_scale: F,
) -> bool {
    let n = contact.normal;
    let r1 = contact.point - b1.position;
    let r2 = contact.point - b2.position;
    let v_rel = b1.velocity_at(contact.point) - b2.velocity_at(contact.point);
    let vn = v_rel.dot(n);
    if vn >= F::zero() {
        return false;
    }

    let rn1 = r1.cross(n);
    let rn2 = r2.cross(n);
    let denom = b1.inv_mass()
        + b2.inv_mass()
        + rn1 * rn1 * b1.inv_inertia()
        + rn2 * rn2 * b2.inv_inertia();
    let j = -(F::one() + elasticity) * vn / denom;

    b1.linear_velocity += n * (j * b1.inv_mass());
    b1.angular_velocity = b1.angular_velocity + j * rn1 * b1.inv_inertia();
    b2.linear_velocity -= n * (j * b2.inv_mass());
    b2.angular_velocity = b2.angular_velocity - j * rn2 * b2.inv_inertia();

    b1.scale_velocity(damping_scale);
    b2.scale_velocity(damping_scale);
    true
}
