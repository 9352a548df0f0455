//! Net-force accumulation for the mass-spring system.

use crate::config::{CollisionMode, MassSpringConfig};
use crate::constraint::AreaConstraint;
use crate::float::Float;
use crate::particle::Particle;
use crate::spring::{MouseSpring, Spring};
use crate::vec::Vec2;
use crate::wall::Wall;

/// Multiplier on `collision_damping` for the penalty-contact damping term.
const PENALTY_DAMPING_GAIN: f64 = 10.0;

/// Everything besides the particles that contributes force.
///
/// Borrowed separately from the particle array so integrators can re-evaluate
/// forces at trial states while holding the particles mutably.
pub struct ForceField<'a, F: Float> {
    pub springs: &'a [Spring<F>],
    pub triangles: &'a [AreaConstraint<F>],
    pub walls: &'a [Wall<F>],
    pub mouse: Option<&'a MouseSpring<F, usize>>,
    pub config: &'a MassSpringConfig<F>,
}

impl<'a, F: Float> ForceField<'a, F> {
    /// Reset every particle's force and accumulate all contributions at the
    /// particles' current positions and velocities.
    pub fn compute(&self, particles: &mut [Particle<F>]) {
        let config = self.config;

        for p in particles.iter_mut() {
            p.force = Vec2::zero();
        }

        if config.use_gravity {
            let down = Vec2::new(F::zero(), -config.gravity);
            for p in particles.iter_mut() {
                p.force += down * p.mass;
            }
        }

        for p in particles.iter_mut() {
            p.force -= p.velocity * config.damping;
        }

        if config.collisions == CollisionMode::Penalty {
            for p in particles.iter_mut() {
                for wall in self.walls {
                    let f = penalty_force(p, wall, config);
                    p.force += f;
                }
            }
        }

        for spring in self.springs {
            spring.apply(particles, config.spring_stiffness, config.spring_damping);
        }

        for triangle in self.triangles {
            triangle.apply(particles, config.area_stiffness);
        }

        if let Some(mouse) = self.mouse {
            let p = &mut particles[mouse.anchor];
            let f = mouse.force(p.position, p.velocity, config.mouse_stiffness, config.mouse_damping);
            p.apply_force(f);
        }
    }
}

/// Repulsive wall force on a particle whose disc overlaps the wall.
///
/// `k * penetration * n` pushes it back inside; while penetrating, an extra
/// `-10 * collision_damping * (v . n) * n` damps motion along the normal.
fn penalty_force<F: Float>(p: &Particle<F>, wall: &Wall<F>, config: &MassSpringConfig<F>) -> Vec2<F> {
    let penetration = config.particle_radius - wall.signed_distance(p.position);
    if penetration <= F::zero() {
        return Vec2::zero();
    }
    let n = wall.normal;
    let spring = n * (config.collision_stiffness * penetration);
    let damping = F::from_f64(PENALTY_DAMPING_GAIN) * config.collision_damping * p.velocity.dot(n);
    spring - n * damping
}
