//! Point masses driven by accumulated forces.

use crate::float::Float;
use crate::vec::Vec2;

/// A point mass with explicit velocity and a per-tick force accumulator.
///
/// `position_t`, `velocity_t` and `acceleration` are integrator scratch
/// state: the midpoint scheme snapshots the start-of-step state into the
/// first two, velocity Verlet carries `acceleration` between ticks.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub position: Vec2<F>,
    pub velocity: Vec2<F>,
    pub force: Vec2<F>,
    pub mass: F,
    pub locked: bool,
    pub position_t: Vec2<F>,
    pub velocity_t: Vec2<F>,
    pub acceleration: Vec2<F>,
}

impl<F: Float> Particle<F> {
    pub fn new(position: Vec2<F>, velocity: Vec2<F>, mass: F) -> Self {
        Particle {
            position,
            velocity,
            force: Vec2::zero(),
            mass,
            locked: false,
            position_t: position,
            velocity_t: velocity,
            acceleration: Vec2::zero(),
        }
    }

    /// A particle that integration never moves.
    pub fn locked(position: Vec2<F>, mass: F) -> Self {
        Particle {
            locked: true,
            ..Particle::new(position, Vec2::zero(), mass)
        }
    }

    /// Inverse mass, zero for massless particles.
    pub fn inv_mass(&self) -> F {
        if self.mass.is_near_zero(F::epsilon()) {
            F::zero()
        } else {
            F::one() / self.mass
        }
    }

    /// Acceleration produced by the currently accumulated force.
    pub fn force_acceleration(&self) -> Vec2<F> {
        self.force * self.inv_mass()
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        self.force += force;
    }

    pub fn kinetic_energy(&self) -> F {
        F::half() * self.mass * self.velocity.length_sq()
    }

    /// Store the current state as the start-of-step snapshot.
    pub(crate) fn snapshot(&mut self) {
        self.position_t = self.position;
        self.velocity_t = self.velocity;
    }
}
