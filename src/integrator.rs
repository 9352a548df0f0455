//! Time-integration schemes for particle systems.
//!
//! Each scheme takes a force closure that resets and re-accumulates
//! `Particle::force` at the particles' current state, so it can be evaluated
//! again at trial states. Locked particles never change position or velocity.

use crate::config::Integrator;
use crate::float::Float;
use crate::particle::Particle;

/// Advance all unlocked particles by `dt` using `scheme`.
pub fn advance<F, C>(scheme: Integrator, particles: &mut [Particle<F>], dt: F, compute_forces: C)
where
    F: Float,
    C: FnMut(&mut [Particle<F>]),
{
    match scheme {
        Integrator::SymplecticEuler => symplectic_euler(particles, dt, compute_forces),
        Integrator::Midpoint => midpoint(particles, dt, compute_forces),
        Integrator::VelocityVerlet => velocity_verlet(particles, dt, compute_forces),
    }
}

/// Positions move with the velocity from before this step; velocities then
/// take the force evaluated at the start of the step.
pub fn symplectic_euler<F, C>(particles: &mut [Particle<F>], dt: F, mut compute_forces: C)
where
    F: Float,
    C: FnMut(&mut [Particle<F>]),
{
    compute_forces(particles);

    for p in particles.iter_mut().filter(|p| !p.locked) {
        p.position += p.velocity * dt;
    }

    for p in particles.iter_mut().filter(|p| !p.locked) {
        p.velocity += p.force_acceleration() * dt;
    }
}

/// Second-order Runge-Kutta: evaluate forces at a half-step trial state and
/// use those derivatives to advance the original state by the full step.
pub fn midpoint<F, C>(particles: &mut [Particle<F>], dt: F, mut compute_forces: C)
where
    F: Float,
    C: FnMut(&mut [Particle<F>]),
{
    let half_dt = dt * F::half();

    for p in particles.iter_mut() {
        p.snapshot();
    }

    compute_forces(particles);

    for p in particles.iter_mut().filter(|p| !p.locked) {
        let accel = p.force_acceleration();
        p.position = p.position_t + p.velocity_t * half_dt;
        p.velocity = p.velocity_t + accel * half_dt;
    }

    compute_forces(particles);

    for p in particles.iter_mut().filter(|p| !p.locked) {
        let accel = p.force_acceleration();
        p.position = p.position_t + p.velocity * dt;
        p.velocity = p.velocity_t + accel * dt;
    }
}

/// Velocity Verlet. Uses each particle's `acceleration` from the previous
/// step and stores the new one for the next.
pub fn velocity_verlet<F, C>(particles: &mut [Particle<F>], dt: F, mut compute_forces: C)
where
    F: Float,
    C: FnMut(&mut [Particle<F>]),
{
    let half_dt_sq = F::half() * dt * dt;

    for p in particles.iter_mut().filter(|p| !p.locked) {
        p.position += p.velocity * dt + p.acceleration * half_dt_sq;
    }

    compute_forces(particles);

    for p in particles.iter_mut().filter(|p| !p.locked) {
        let accel = p.force_acceleration();
        p.velocity += (p.acceleration + accel) * (F::half() * dt);
        p.acceleration = accel;
    }
}
