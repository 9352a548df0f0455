//! Step observer trait for monitoring simulation progress.

use crate::collision::Contact;
use crate::float::Float;

/// Trait for observing simulation steps.
///
/// Implement this trait to react to what happened inside a step (e.g., for
/// debugging, collision highlighting, or performance profiling). All methods
/// have default no-op implementations.
pub trait StepObserver<F: Float> {
    /// Called after net forces (and torques) have been accumulated.
    fn on_forces_computed(&mut self) {}

    /// Called when the impulse pass reflects a particle off a wall.
    fn on_particle_wall_contact(&mut self, _particle: usize, _wall: usize) {}

    /// Called when a rigid body receives a wall impulse.
    fn on_body_wall_contact(&mut self, _body: usize, _wall: usize, _contact: &Contact<F>) {}

    /// Called for every overlapping body pair, whether or not an impulse was applied.
    fn on_body_contact(&mut self, _first: usize, _second: usize, _contact: &Contact<F>) {}

    /// Called after all entities have been integrated.
    fn on_integrate(&mut self) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}
