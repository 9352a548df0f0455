//! Deformable bodies as particles, springs and area-preserving triangles.

use crate::collision::reflect_particle;
use crate::config::{CollisionMode, MassSpringConfig};
use crate::constraint::AreaConstraint;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::forces::ForceField;
use crate::integrator;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::Particle;
use crate::spring::{MouseSpring, Spring};
use crate::vec::Vec2;
use crate::wall::{box_corners, Wall};
use alloc::vec::Vec as AllocVec;
use tracing::{debug, trace, warn};

/// A mass-spring network inside a square box.
///
/// Springs and triangles refer to particles by index. Removing a particle
/// that is still referenced is refused; otherwise later indices shift down
/// and every constraint is re-indexed.
pub struct MassSpringSystem<F: Float> {
    pub config: MassSpringConfig<F>,
    particles: AllocVec<Particle<F>>,
    springs: AllocVec<Spring<F>>,
    triangles: AllocVec<AreaConstraint<F>>,
    mouse: Option<MouseSpring<F, usize>>,
}

impl<F: Float> MassSpringSystem<F> {
    pub fn new(config: MassSpringConfig<F>) -> Self {
        MassSpringSystem {
            config,
            particles: AllocVec::new(),
            springs: AllocVec::new(),
            triangles: AllocVec::new(),
            mouse: None,
        }
    }

    /// Restore default parameters, keeping the box size and all entities.
    pub fn reset_parameters(&mut self) {
        let half_extent = self.config.box_half_extent;
        self.config = MassSpringConfig::new().with_box_half_extent(half_extent);
    }

    /// Replace the configuration after validating it.
    pub fn set_config(&mut self, config: MassSpringConfig<F>) -> Result<(), PhysicsError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected mass-spring config");
            return Err(err);
        }
        self.config = config;
        Ok(())
    }

    /// Remove all particles, springs and triangles, and release the mouse spring.
    pub fn clear(&mut self) {
        debug!(
            particles = self.particles.len(),
            springs = self.springs.len(),
            triangles = self.triangles.len(),
            "clearing mass-spring system"
        );
        self.particles.clear();
        self.springs.clear();
        self.triangles.clear();
        self.mouse = None;
    }

    /// Add a particle with the configured particle mass. Returns its index.
    pub fn add_particle(&mut self, position: Vec2<F>, velocity: Vec2<F>, locked: bool) -> usize {
        self.add_particle_with_mass(position, velocity, self.config.particle_mass, locked)
    }

    pub fn add_particle_with_mass(&mut self, position: Vec2<F>, velocity: Vec2<F>, mass: F, locked: bool) -> usize {
        let idx = self.particles.len();
        let mut particle = Particle::new(position, velocity, mass);
        particle.locked = locked;
        self.particles.push(particle);
        debug!(index = idx, locked, "added particle");
        idx
    }

    /// Connect two existing particles. The rest length is their current distance.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn add_spring(&mut self, a: usize, b: usize) -> usize {
        self.assert_particle(a);
        self.assert_particle(b);
        let idx = self.springs.len();
        self.springs.push(Spring::from_particles(a, b, &self.particles));
        debug!(index = idx, a, b, "added spring");
        idx
    }

    /// Add an area-preserving triangle over three existing particles.
    ///
    /// # Panics
    /// If any index is out of range.
    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize) -> usize {
        self.assert_particle(a);
        self.assert_particle(b);
        self.assert_particle(c);
        let idx = self.triangles.len();
        self.triangles.push(AreaConstraint::from_particles(a, b, c, &self.particles));
        debug!(index = idx, a, b, c, "added triangle");
        idx
    }

    pub fn remove_spring(&mut self, index: usize) -> Spring<F> {
        self.springs.remove(index)
    }

    pub fn remove_triangle(&mut self, index: usize) -> AreaConstraint<F> {
        self.triangles.remove(index)
    }

    /// Remove an unreferenced particle and shift every later index down by one.
    pub fn remove_particle(&mut self, index: usize) -> Result<Particle<F>, PhysicsError> {
        let count = self.particles.len();
        if index >= count {
            return Err(PhysicsError::ParticleOutOfBounds { index, count });
        }
        let referenced = self.springs.iter().any(|s| s.a == index || s.b == index)
            || self.triangles.iter().any(|t| t.indices().contains(&index))
            || self.mouse.map_or(false, |m| m.anchor == index);
        if referenced {
            return Err(PhysicsError::ParticleInUse { index });
        }

        let shift = |i: &mut usize| {
            if *i > index {
                *i -= 1;
            }
        };
        for s in self.springs.iter_mut() {
            shift(&mut s.a);
            shift(&mut s.b);
        }
        for t in self.triangles.iter_mut() {
            shift(&mut t.a);
            shift(&mut t.b);
            shift(&mut t.c);
        }
        if let Some(m) = self.mouse.as_mut() {
            shift(&mut m.anchor);
        }
        debug!(index, "removed particle");
        Ok(self.particles.remove(index))
    }

    pub fn set_locked(&mut self, index: usize, locked: bool) {
        self.particles[index].locked = locked;
    }

    /// Index of the particle closest to `point`, by exhaustive scan.
    pub fn nearest_particle(&self, point: Vec2<F>) -> Option<usize> {
        let mut best: Option<(usize, F)> = None;
        for (i, p) in self.particles.iter().enumerate() {
            let d = p.position.distance_sq(point);
            match best {
                Some((_, best_d)) if best_d <= d => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Attach the mouse spring to the particle nearest `point`.
    ///
    /// Does nothing when the system has no particles.
    pub fn begin_drag(&mut self, point: Vec2<F>) {
        self.mouse = self.nearest_particle(point).map(|idx| MouseSpring::new(point, idx));
        if let Some(m) = &self.mouse {
            debug!(particle = m.anchor, "mouse spring attached");
        }
    }

    /// Move the mouse spring target. No-op while inactive.
    pub fn update_drag(&mut self, point: Vec2<F>) {
        if let Some(m) = self.mouse.as_mut() {
            m.target = point;
        }
    }

    pub fn end_drag(&mut self) {
        if self.mouse.take().is_some() {
            debug!("mouse spring released");
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.mouse.is_some()
    }

    /// Where the mouse spring is pulling, while active.
    pub fn drag_target(&self) -> Option<Vec2<F>> {
        self.mouse.map(|m| m.target)
    }

    /// The active mouse spring, if any.
    pub fn mouse_spring(&self) -> Option<&MouseSpring<F, usize>> {
        self.mouse.as_ref()
    }

    /// Recompute every particle's net force at the current state.
    pub fn compute_forces(&mut self) {
        let walls = self.walls();
        let field = ForceField {
            springs: &self.springs,
            triangles: &self.triangles,
            walls: &walls,
            mouse: self.mouse.as_ref(),
            config: &self.config,
        };
        field.compute(&mut self.particles);
    }

    /// Advance by one configured time step.
    pub fn step(&mut self) {
        self.step_with(&mut NoOpStepObserver);
    }

    pub fn step_with<O: StepObserver<F>>(&mut self, observer: &mut O) {
        let dt = self.config.time_step;
        let walls = self.walls();
        let field = ForceField {
            springs: &self.springs,
            triangles: &self.triangles,
            walls: &walls,
            mouse: self.mouse.as_ref(),
            config: &self.config,
        };

        let mut evaluated = false;
        integrator::advance(self.config.integrator, &mut self.particles, dt, |ps| {
            field.compute(ps);
            if !evaluated {
                observer.on_forces_computed();
                evaluated = true;
            }
        });
        observer.on_integrate();

        if self.config.collisions == CollisionMode::Impulse {
            self.impulse_collisions(observer);
        }

        trace!(particles = self.particles.len(), "mass-spring step");
        observer.on_step_complete();
    }

    /// Reflect every unlocked particle that overlaps a wall while moving into it.
    fn impulse_collisions<O: StepObserver<F>>(&mut self, observer: &mut O) {
        let radius = self.config.particle_radius;
        let damping = self.config.collision_damping;
        let walls = self.walls();
        for (i, p) in self.particles.iter_mut().enumerate() {
            for (w, wall) in walls.iter().enumerate() {
                if reflect_particle(p, wall, radius, damping) {
                    trace!(particle = i, wall = w, "particle-wall impulse");
                    observer.on_particle_wall_contact(i, w);
                }
            }
        }
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> &Particle<F> {
        &self.particles[index]
    }

    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<F> {
        &mut self.particles[index]
    }

    pub fn springs(&self) -> &[Spring<F>] {
        &self.springs
    }

    pub fn triangles(&self) -> &[AreaConstraint<F>] {
        &self.triangles
    }

    /// The four box walls at the configured half extent.
    pub fn walls(&self) -> [Wall<F>; 4] {
        Wall::box_walls(self.config.box_half_extent)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Spring endpoints as index pairs.
    pub fn spring_indices(&self) -> AllocVec<[usize; 2]> {
        self.springs.iter().map(|s| [s.a, s.b]).collect()
    }

    pub fn triangle_indices(&self) -> AllocVec<[usize; 3]> {
        self.triangles.iter().map(|t| t.indices()).collect()
    }

    /// Box outline as a closed line strip.
    pub fn wall_corners(&self) -> AllocVec<Vec2<F>> {
        box_corners(&self.walls())
    }

    pub fn kinetic_energy(&self) -> F {
        self.particles.iter().fold(F::zero(), |acc, p| acc + p.kinetic_energy())
    }

    pub fn spring_potential_energy(&self) -> F {
        let k = self.config.spring_stiffness;
        self.springs
            .iter()
            .fold(F::zero(), |acc, s| acc + s.potential_energy(&self.particles, k))
    }

    /// Kinetic plus spring energy, plus gravitational energy when gravity is on.
    pub fn total_energy(&self) -> F {
        let mut energy = self.kinetic_energy() + self.spring_potential_energy();
        if self.config.use_gravity {
            let g = self.config.gravity;
            energy = self
                .particles
                .iter()
                .fold(energy, |acc, p| acc + p.mass * g * p.position.y);
        }
        energy
    }

    fn assert_particle(&self, index: usize) {
        assert!(
            index < self.particles.len(),
            "particle index {} out of bounds (count: {})",
            index,
            self.particles.len()
        );
    }
}

impl<F: Float> Default for MassSpringSystem<F> {
    fn default() -> Self {
        Self::new(MassSpringConfig::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> MassSpringSystem<f64> {
        MassSpringSystem::new(MassSpringConfig::new().with_gravity(false))
    }

    #[test]
    fn nearest_particle_by_distance() {
        let mut sys = system();
        assert_eq!(sys.nearest_particle(Vec2::zero()), None);
        sys.add_particle(Vec2::new(0.5, 0.5), Vec2::zero(), false);
        sys.add_particle(Vec2::new(-0.2, 0.1), Vec2::zero(), false);
        assert_eq!(sys.nearest_particle(Vec2::zero()), Some(1));
        assert_eq!(sys.nearest_particle(Vec2::new(0.4, 0.4)), Some(0));
    }

    #[test]
    fn drag_lifecycle() {
        let mut sys = system();
        sys.begin_drag(Vec2::zero());
        assert!(!sys.is_dragging());
        sys.update_drag(Vec2::new(1.0, 1.0));
        assert!(sys.mouse_spring().is_none());

        sys.add_particle(Vec2::new(0.1, 0.0), Vec2::zero(), false);
        sys.begin_drag(Vec2::zero());
        assert!(sys.is_dragging());
        sys.update_drag(Vec2::new(0.3, 0.2));
        let m = sys.mouse_spring().unwrap();
        assert_eq!(m.anchor, 0);
        assert_eq!(m.target, Vec2::new(0.3, 0.2));
        sys.end_drag();
        assert!(!sys.is_dragging());
    }

    #[test]
    fn remove_referenced_particle_refused() {
        let mut sys = system();
        let a = sys.add_particle(Vec2::new(0.0, 0.0), Vec2::zero(), false);
        let b = sys.add_particle(Vec2::new(0.1, 0.0), Vec2::zero(), false);
        sys.add_spring(a, b);
        assert_eq!(sys.remove_particle(a).unwrap_err(), PhysicsError::ParticleInUse { index: a });
        assert_eq!(
            sys.remove_particle(7).unwrap_err(),
            PhysicsError::ParticleOutOfBounds { index: 7, count: 2 }
        );
    }

    #[test]
    fn remove_particle_reindexes_constraints() {
        let mut sys = system();
        let lonely = sys.add_particle(Vec2::new(0.9, 0.9), Vec2::zero(), false);
        let a = sys.add_particle(Vec2::new(0.0, 0.0), Vec2::zero(), false);
        let b = sys.add_particle(Vec2::new(0.1, 0.0), Vec2::zero(), false);
        let c = sys.add_particle(Vec2::new(0.0, 0.1), Vec2::zero(), false);
        sys.add_spring(a, b);
        sys.add_triangle(a, b, c);
        let rest = sys.springs()[0].rest_length();

        sys.remove_particle(lonely).unwrap();
        assert_eq!(sys.spring_indices(), [[0, 1]]);
        assert_eq!(sys.triangle_indices(), [[0, 1, 2]]);
        assert!((sys.springs()[0].length(sys.particles()) - rest).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn spring_to_missing_particle_panics() {
        let mut sys = system();
        sys.add_particle(Vec2::zero(), Vec2::zero(), false);
        sys.add_spring(0, 3);
    }

    #[test]
    fn clear_drops_everything() {
        let mut sys = system();
        let a = sys.add_particle(Vec2::zero(), Vec2::zero(), false);
        let b = sys.add_particle(Vec2::new(0.1, 0.0), Vec2::zero(), false);
        sys.add_spring(a, b);
        sys.begin_drag(Vec2::zero());
        sys.clear();
        assert_eq!(sys.particle_count(), 0);
        assert!(sys.springs().is_empty());
        assert!(!sys.is_dragging());
    }

    #[test]
    fn set_config_rejects_invalid_and_keeps_old() {
        let mut sys = system();
        let bad = MassSpringConfig::new().with_time_step(-1.0);
        assert_eq!(sys.set_config(bad), Err(PhysicsError::InvalidTimeStep));
        assert!(sys.config.time_step > 0.0);

        let wide = MassSpringConfig::new().with_box_half_extent(2.0);
        sys.set_config(wide).unwrap();
        assert_eq!(sys.wall_corners()[0], Vec2::new(-2.0, -2.0));
    }

    #[test]
    fn box_follows_config_field_between_steps() {
        let mut sys = system();
        sys.config.box_half_extent = 2.0;
        let i = sys.add_particle(Vec2::new(1.5, 0.0), Vec2::zero(), false);
        sys.compute_forces();
        assert_eq!(sys.particle(i).force, Vec2::zero());
        assert_eq!(sys.wall_corners()[0], Vec2::new(-2.0, -2.0));
        assert_eq!(sys.walls()[1].p0, Vec2::new(2.0, -2.0));

        sys.config.collisions = CollisionMode::Impulse;
        sys.particle_mut(i).velocity = Vec2::new(1.0, 0.0);
        sys.step();
        assert!(sys.particle(i).velocity.x > 0.0);
    }

    #[test]
    fn reset_parameters_restores_defaults() {
        let mut sys = system();
        sys.config.damping = 3.0;
        sys.reset_parameters();
        assert_eq!(sys.config, MassSpringConfig::new());
    }
}
