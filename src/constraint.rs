//! Area-preserving triangle constraint.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;

/// Signed area of the triangle `(p0, p1, p2)`, positive when counter-clockwise.
pub fn signed_area<F: Float>(p0: Vec2<F>, p1: Vec2<F>, p2: Vec2<F>) -> F {
    F::half() * (p1 - p0).cross(p2 - p0)
}

/// Elastic constraint holding the signed area of three particles at its rest value.
///
/// The force on each vertex is `-stiffness * (area - rest_area) * dA/dp`,
/// where the gradient of the signed area with respect to `p0` is
/// `0.5 * perp(p2 - p1)` and cyclically for the other two vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    rest_area: F,
}

impl<F: Float> AreaConstraint<F> {
    /// Capture the current signed area of `(a, b, c)` as the rest area.
    pub fn from_particles(a: usize, b: usize, c: usize, particles: &[Particle<F>]) -> Self {
        let rest_area = signed_area(
            particles[a].position,
            particles[b].position,
            particles[c].position,
        );
        AreaConstraint { a, b, c, rest_area }
    }

    pub fn rest_area(&self) -> F {
        self.rest_area
    }

    pub fn area(&self, particles: &[Particle<F>]) -> F {
        signed_area(
            particles[self.a].position,
            particles[self.b].position,
            particles[self.c].position,
        )
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    pub fn apply(&self, particles: &mut [Particle<F>], stiffness: F) {
        let p0 = particles[self.a].position;
        let p1 = particles[self.b].position;
        let p2 = particles[self.c].position;
        let error = signed_area(p0, p1, p2) - self.rest_area;
        if error == F::zero() {
            return;
        }
        let scale = -stiffness * error * F::half();
        particles[self.a].apply_force((p2 - p1).perp() * scale);
        particles[self.b].apply_force((p0 - p2).perp() * scale);
        particles[self.c].apply_force((p1 - p0).perp() * scale);
    }
}
