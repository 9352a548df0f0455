//! Damped springs between particles, and the interactive mouse spring.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;

/// Elastic, damped link between two particles of the same system.
///
/// Endpoints are indices into the owning system's particle array. The rest
/// length is captured once at construction and never recomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring<F: Float> {
    pub a: usize,
    pub b: usize,
    rest_length: F,
}

impl<F: Float> Spring<F> {
    /// Create a spring whose rest length is the current distance between `a` and `b`.
    pub fn from_particles(a: usize, b: usize, particles: &[Particle<F>]) -> Self {
        let rest_length = particles[a].position.distance(particles[b].position);
        Spring { a, b, rest_length }
    }

    pub fn rest_length(&self) -> F {
        self.rest_length
    }

    /// Current distance between the endpoints.
    pub fn length(&self, particles: &[Particle<F>]) -> F {
        particles[self.a].position.distance(particles[self.b].position)
    }

    /// Elastic potential `0.5 * k * (length - rest)^2`.
    pub fn potential_energy(&self, particles: &[Particle<F>], stiffness: F) -> F {
        let extension = self.length(particles) - self.rest_length;
        F::half() * stiffness * extension * extension
    }

    /// Accumulate the spring and damping force into both endpoints.
    pub fn apply(&self, particles: &mut [Particle<F>], stiffness: F, damping: F) {
        let (p0, p1) = (&particles[self.a], &particles[self.b]);
        let f = damped_spring_force(
            p0.position,
            p0.velocity,
            p1.position,
            p1.velocity,
            self.rest_length,
            stiffness,
            damping,
        );
        particles[self.a].apply_force(f);
        particles[self.b].apply_force(-f);
    }
}

/// Force on the first endpoint of a damped spring; the second receives its negation.
///
/// With `d` the unit vector from `p1` to `p0`, the magnitude is
/// `stiffness * (|p0 - p1| - rest) + damping * dot(v0 - v1, d)` and the force
/// is `-magnitude * d`. Coincident endpoints give no direction and yield zero.
pub fn damped_spring_force<F: Float>(
    p0: Vec2<F>,
    v0: Vec2<F>,
    p1: Vec2<F>,
    v1: Vec2<F>,
    rest_length: F,
    stiffness: F,
    damping: F,
) -> Vec2<F> {
    let delta = p0 - p1;
    let length = delta.length();
    if length.is_near_zero(F::epsilon()) {
        return Vec2::zero();
    }
    let d = delta / length;
    let magnitude = stiffness * (length - rest_length) + damping * (v0 - v1).dot(d);
    -(d * magnitude)
}

/// Zero-rest-length spring pulling an entity toward the pointer.
///
/// `A` identifies what is being dragged: a particle index for the
/// mass-spring system, a `(body, point)` pair for rigid bodies. Owners keep
/// it in an `Option`; `Some` means the spring is active.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseSpring<F: Float, A: Copy> {
    pub target: Vec2<F>,
    pub anchor: A,
}

impl<F: Float, A: Copy> MouseSpring<F, A> {
    pub fn new(target: Vec2<F>, anchor: A) -> Self {
        MouseSpring { target, anchor }
    }

    /// Force on a point at `position` moving with `velocity`; the target is static.
    pub fn force(&self, position: Vec2<F>, velocity: Vec2<F>, stiffness: F, damping: F) -> Vec2<F> {
        damped_spring_force(
            position,
            velocity,
            self.target,
            Vec2::zero(),
            F::zero(),
            stiffness,
            damping,
        )
    }
}
